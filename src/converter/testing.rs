//! Test doubles for the controller's collaborators.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use super::error::ConvertError;
use super::ffmpeg::Transcoder;
use super::formats::EncodingOptions;
use super::scanner::FileSystem;
use super::surface::PresentationSurface;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Scripted transcoder keyed by input file name.
///
/// Unscripted files probe at 10 seconds and convert successfully.
#[derive(Default)]
pub struct FakeTranscoder {
    missing: bool,
    durations: HashMap<String, Option<f64>>,
    lines: HashMap<String, Vec<String>>,
    exit_codes: HashMap<String, i32>,
    transcoded: RefCell<Vec<PathBuf>>,
}

impl FakeTranscoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, name: &str, seconds: f64) -> Self {
        self.durations.insert(name.to_string(), Some(seconds));
        self
    }

    pub fn without_duration(mut self, name: &str) -> Self {
        self.durations.insert(name.to_string(), None);
        self
    }

    pub fn with_lines(mut self, name: &str, lines: &[&str]) -> Self {
        self.lines
            .insert(name.to_string(), lines.iter().map(|l| l.to_string()).collect());
        self
    }

    pub fn failing(mut self, name: &str, exit_code: i32) -> Self {
        self.exit_codes.insert(name.to_string(), exit_code);
        self
    }

    /// Inputs handed to `transcode`, in call order.
    pub fn transcoded(&self) -> Vec<PathBuf> {
        self.transcoded.borrow().clone()
    }
}

impl Transcoder for FakeTranscoder {
    fn check_available(&self) -> Result<(), ConvertError> {
        if self.missing {
            Err(ConvertError::ToolNotFound(PathBuf::from("ffmpeg")))
        } else {
            Ok(())
        }
    }

    fn probe_duration(&self, input: &Path) -> Result<f64, ConvertError> {
        match self.durations.get(&file_name(input)) {
            Some(Some(seconds)) => Ok(*seconds),
            Some(None) => Err(ConvertError::DurationUnavailable {
                path: input.to_path_buf(),
                reason: "FFprobe reported N/A".to_string(),
            }),
            None => Ok(10.0),
        }
    }

    fn transcode(
        &self,
        input: &Path,
        _output: &Path,
        _options: &EncodingOptions,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<(), ConvertError> {
        self.transcoded.borrow_mut().push(input.to_path_buf());

        let name = file_name(input);
        for line in self.lines.get(&name).into_iter().flatten() {
            on_line(line.as_str());
        }

        match self.exit_codes.get(&name) {
            Some(code) => Err(ConvertError::TranscodeFailed {
                exit_code: Some(*code),
            }),
            None => Ok(()),
        }
    }
}

/// In-memory file tree. Paths are stored in the order they were added.
#[derive(Default)]
pub struct MemoryFileSystem {
    files: RefCell<Vec<PathBuf>>,
    unremovable: HashSet<PathBuf>,
    unreadable_root: bool,
}

impl MemoryFileSystem {
    pub fn with_files(paths: &[&str]) -> Self {
        Self {
            files: RefCell::new(paths.iter().map(PathBuf::from).collect()),
            ..Self::default()
        }
    }

    pub fn unremovable(mut self, path: &str) -> Self {
        self.unremovable.insert(PathBuf::from(path));
        self
    }

    pub fn unreadable(mut self) -> Self {
        self.unreadable_root = true;
        self
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.borrow().iter().any(|p| p == Path::new(path))
    }
}

impl FileSystem for MemoryFileSystem {
    fn list_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        if self.unreadable_root {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        }
        Ok(self
            .files
            .borrow()
            .iter()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().iter().any(|p| p == path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        if self.unremovable.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "file is locked"));
        }
        let mut files = self.files.borrow_mut();
        let before = files.len();
        files.retain(|p| p != path);
        if files.len() == before {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        }
        Ok(())
    }
}

/// One call made on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    OverallMax(usize),
    Overall(usize),
    FileMax(f64),
    File(f64),
    Status(String),
    Error(String),
    Info(String),
    Confirm(String),
    PickFolder,
    StartEnabled(bool),
}

/// Surface that records every call and answers questions from presets.
#[derive(Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
    pub folder: Option<PathBuf>,
    pub confirm_answer: bool,
}

impl RecordingSurface {
    pub fn picking(folder: &str) -> Self {
        Self {
            folder: Some(PathBuf::from(folder)),
            ..Self::default()
        }
    }

    pub fn answering(mut self, answer: bool) -> Self {
        self.confirm_answer = answer;
        self
    }

    pub fn file_calls(&self) -> Vec<SurfaceCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::FileMax(_) | SurfaceCall::File(_)))
            .cloned()
            .collect()
    }

    pub fn overall_values(&self) -> Vec<usize> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::Overall(v) => Some(*v),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::Error(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn infos(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::Info(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn confirmations(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::Confirm(_)))
            .count()
    }

    pub fn start_toggles(&self) -> Vec<bool> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::StartEnabled(e) => Some(*e),
                _ => None,
            })
            .collect()
    }
}

impl PresentationSurface for RecordingSurface {
    fn set_overall_max(&mut self, max: usize) {
        self.calls.push(SurfaceCall::OverallMax(max));
    }

    fn set_overall(&mut self, value: usize) {
        self.calls.push(SurfaceCall::Overall(value));
    }

    fn set_file_max(&mut self, max: f64) {
        self.calls.push(SurfaceCall::FileMax(max));
    }

    fn set_file(&mut self, value: f64) {
        self.calls.push(SurfaceCall::File(value));
    }

    fn set_status(&mut self, text: &str) {
        self.calls.push(SurfaceCall::Status(text.to_string()));
    }

    fn show_error(&mut self, _title: &str, message: &str) {
        self.calls.push(SurfaceCall::Error(message.to_string()));
    }

    fn show_info(&mut self, _title: &str, message: &str) {
        self.calls.push(SurfaceCall::Info(message.to_string()));
    }

    fn confirm(&mut self, _title: &str, message: &str) -> bool {
        self.calls.push(SurfaceCall::Confirm(message.to_string()));
        self.confirm_answer
    }

    fn pick_folder(&mut self) -> Option<PathBuf> {
        self.calls.push(SurfaceCall::PickFolder);
        self.folder.clone()
    }

    fn set_start_enabled(&mut self, enabled: bool) {
        self.calls.push(SurfaceCall::StartEnabled(enabled));
    }
}
