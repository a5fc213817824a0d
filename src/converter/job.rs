//! Conversion job definition.

use std::path::PathBuf;

use super::formats::output_path_for;

/// Status of a conversion job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    /// Job is waiting in queue
    Pending,
    /// Output already existed, nothing was converted
    SkippedExists,
    /// Job completed successfully
    Succeeded,
    /// Job failed with an error
    Failed { error: String },
}

impl JobStatus {
    /// Whether the source file may be offered for deletion.
    pub fn is_delete_eligible(&self) -> bool {
        matches!(self, JobStatus::SkippedExists | JobStatus::Succeeded)
    }
}

/// A video file to be converted.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Input file path
    pub input_path: PathBuf,
    /// Output file path
    pub output_path: PathBuf,
    /// Current status
    pub status: JobStatus,
}

impl ConversionJob {
    /// Create a pending job writing next to its input.
    pub fn new(input_path: PathBuf, output_extension: &str) -> Self {
        let output_path = output_path_for(&input_path, output_extension);
        Self {
            input_path,
            output_path,
            status: JobStatus::Pending,
        }
    }

    /// Get the input file name.
    pub fn input_filename(&self) -> String {
        self.input_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// One user-initiated conversion session.
#[derive(Debug, Default)]
pub struct BatchRun {
    jobs: Vec<ConversionJob>,
    current_index: usize,
    delete_eligible: Vec<PathBuf>,
}

impl BatchRun {
    /// Build a run from scanned input paths, keeping their order.
    pub fn new(inputs: Vec<PathBuf>, output_extension: &str) -> Self {
        Self {
            jobs: inputs
                .into_iter()
                .map(|p| ConversionJob::new(p, output_extension))
                .collect(),
            current_index: 0,
            delete_eligible: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.jobs.len()
    }

    /// Number of jobs already processed.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The next pending job, if any remain.
    pub fn current(&self) -> Option<&ConversionJob> {
        self.jobs.get(self.current_index)
    }

    /// Record the outcome of the current job and move to the next one.
    pub fn finish_current(&mut self, status: JobStatus) {
        let Some(job) = self.jobs.get_mut(self.current_index) else {
            return;
        };
        if status.is_delete_eligible() {
            self.delete_eligible.push(job.input_path.clone());
        }
        job.status = status;
        self.current_index += 1;
    }

    /// Source files that are safe to offer for removal.
    pub fn delete_eligible(&self) -> &[PathBuf] {
        &self.delete_eligible
    }

    pub fn count(&self, predicate: impl Fn(&JobStatus) -> bool) -> usize {
        self.jobs.iter().filter(|j| predicate(&j.status)).count()
    }
}
