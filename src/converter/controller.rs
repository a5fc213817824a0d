//! The batch conversion state machine.
//!
//! A run goes `Idle → Scanning → (Empty | Converting) →
//! AwaitingDeleteConfirmation → Done`, or ends in `Failed` when FFmpeg is
//! missing or the chosen folder cannot be read. Files are converted strictly
//! one after another; a failure on one file never stops the batch.

use std::path::PathBuf;

use crate::config::ConverterConfig;

use super::convert::convert_file;
use super::error::ConvertError;
use super::ffmpeg::Transcoder;
use super::formats::EncodingOptions;
use super::job::{BatchRun, JobStatus};
use super::scanner::{scan_folder, FileSystem};
use super::surface::{PresentationSurface, StartTriggerGuard};

/// Where a batch run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchState {
    #[default]
    Idle,
    Scanning,
    /// Folder held nothing to convert
    Empty,
    Converting,
    AwaitingDeleteConfirmation,
    Done,
    /// A whole-batch precondition failed
    Failed,
}

impl BatchState {
    /// Whether no further transitions can happen in this run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BatchState::Idle | BatchState::Empty | BatchState::Done | BatchState::Failed
        )
    }

    /// Returns a human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            BatchState::Idle => "Idle",
            BatchState::Scanning => "Scanning",
            BatchState::Empty => "Nothing to convert",
            BatchState::Converting => "Converting",
            BatchState::AwaitingDeleteConfirmation => "Awaiting confirmation",
            BatchState::Done => "Done",
            BatchState::Failed => "Failed",
        }
    }
}

/// Tallies for one finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub state: BatchState,
    pub folder: Option<PathBuf>,
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub deleted: usize,
    pub delete_failures: usize,
}

/// Drives one batch at a time over injected collaborators.
pub struct BatchController<T, F> {
    transcoder: T,
    fs: F,
    input_extensions: Vec<String>,
    output_extension: String,
    options: EncodingOptions,
    state: BatchState,
}

impl<T: Transcoder, F: FileSystem> BatchController<T, F> {
    pub fn new(transcoder: T, fs: F, config: &ConverterConfig, options: EncodingOptions) -> Self {
        Self {
            transcoder,
            fs,
            input_extensions: config.input_extensions.clone(),
            output_extension: config.output_extension.clone(),
            options,
            state: BatchState::Idle,
        }
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Run one batch from folder selection to cleanup.
    ///
    /// The start trigger is disabled for the duration of the call and
    /// re-enabled on every way out. Always ends in a terminal state.
    pub fn run<S: PresentationSurface + ?Sized>(&mut self, surface: &mut S) -> RunSummary {
        let mut surface = StartTriggerGuard::new(surface);
        self.state = BatchState::Idle;

        let Some(folder) = surface.pick_folder() else {
            log::info!("No folder selected");
            return self.summary(None, None);
        };
        log::info!("Starting batch in {:?} with {:?}", folder, self.options);

        if let Err(e) = self.transcoder.check_available() {
            log::error!("{}", e);
            surface.show_error("FFmpeg not found", &e.to_string());
            self.state = BatchState::Failed;
            return self.summary(Some(folder), None);
        }

        self.state = BatchState::Scanning;
        surface.set_status("Scanning folder...");
        let inputs = match scan_folder(&self.fs, &folder, &self.input_extensions) {
            Ok(inputs) => inputs,
            Err(e) => {
                log::error!("{}", e);
                surface.show_error("Scan failed", &e.to_string());
                surface.set_status("Scan failed");
                self.state = BatchState::Failed;
                return self.summary(Some(folder), None);
            }
        };

        if inputs.is_empty() {
            let notice = ConvertError::ScanEmpty(folder.clone());
            log::info!("{}", notice);
            surface.set_status("Nothing to convert");
            surface.show_info("Nothing to convert", &notice.to_string());
            self.state = BatchState::Empty;
            return self.summary(Some(folder), None);
        }

        self.state = BatchState::Converting;
        let mut run = BatchRun::new(inputs, &self.output_extension);
        self.convert_all(&mut run, &mut *surface);

        surface.set_status("Batch conversion complete!");
        let (deleted, delete_failures) = self.offer_cleanup(&run, &mut *surface);

        self.state = BatchState::Done;
        let mut summary = self.summary(Some(folder), Some(&run));
        summary.deleted = deleted;
        summary.delete_failures = delete_failures;
        log::info!("Batch finished: {:?}", summary);
        summary
    }

    fn convert_all<S: PresentationSurface + ?Sized>(&self, run: &mut BatchRun, surface: &mut S) {
        let total = run.total();
        surface.set_overall_max(total);
        surface.set_overall(0);

        while let Some(job) = run.current() {
            let position = format!("({}/{})", run.current_index() + 1, total);
            let name = job.input_filename();
            let input = job.input_path.clone();
            let output = job.output_path.clone();

            let status = if self.fs.exists(&output) {
                log::info!("Skipping {:?}, {:?} already exists", input, output);
                surface.set_status(&format!("Skipping existing file: {name} {position}"));
                JobStatus::SkippedExists
            } else {
                surface.set_status(&format!("Converting: {name} {position}"));
                match convert_file(&self.transcoder, &input, &output, &self.options, &mut *surface) {
                    Ok(()) => {
                        log::info!("Converted {:?} -> {:?}", input, output);
                        JobStatus::Succeeded
                    }
                    Err(e) => {
                        log::error!("Conversion of {:?} failed: {}", input, e);
                        surface.show_error("Conversion failed", &format!("{name}: {e}"));
                        JobStatus::Failed {
                            error: e.to_string(),
                        }
                    }
                }
            };

            run.finish_current(status);
            surface.set_overall(run.current_index());
        }
    }

    /// Ask before removing originals, then remove them one by one.
    ///
    /// Returns `(deleted, failed)` counts.
    fn offer_cleanup<S: PresentationSurface + ?Sized>(
        &mut self,
        run: &BatchRun,
        surface: &mut S,
    ) -> (usize, usize) {
        let eligible = run.delete_eligible();
        if eligible.is_empty() {
            return (0, 0);
        }

        self.state = BatchState::AwaitingDeleteConfirmation;
        let question = format!(
            "All videos have been processed.\nDelete {} original file(s)?",
            eligible.len()
        );
        if !surface.confirm("Delete original files", &question) {
            log::info!("Keeping {} original file(s)", eligible.len());
            return (0, 0);
        }

        let mut deleted = 0;
        let mut failed = 0;
        for path in eligible {
            match self.fs.remove_file(path) {
                Ok(()) => {
                    log::info!("Deleted original {:?}", path);
                    deleted += 1;
                }
                Err(source) => {
                    let e = ConvertError::DeleteFailed {
                        path: path.clone(),
                        source,
                    };
                    log::warn!("{}", e);
                    failed += 1;
                }
            }
        }

        surface.show_info(
            "Original files deleted",
            &format!("Deleted {deleted} of {} original file(s).", eligible.len()),
        );
        (deleted, failed)
    }

    fn summary(&self, folder: Option<PathBuf>, run: Option<&BatchRun>) -> RunSummary {
        let mut summary = RunSummary {
            state: self.state,
            folder,
            ..RunSummary::default()
        };
        if let Some(run) = run {
            summary.total = run.total();
            summary.succeeded = run.count(|s| *s == JobStatus::Succeeded);
            summary.skipped = run.count(|s| *s == JobStatus::SkippedExists);
            summary.failed = run.count(|s| matches!(s, JobStatus::Failed { .. }));
        }
        summary
    }
}
