//! Error kinds raised while scanning, probing, converting and cleaning up.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during a batch conversion.
///
/// Per-file kinds (`DurationUnavailable`, `TranscodeFailed`, `SpawnFailed`)
/// are caught by the batch loop and never end the run. `ToolNotFound` and
/// `ScanFailed` stop the batch before any file is touched.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("No supported video files found in {} or its subfolders", .0.display())]
    ScanEmpty(PathBuf),
    #[error("Failed to scan folder {}: {source}", .path.display())]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not determine the duration of {}: {reason}", .path.display())]
    DurationUnavailable { path: PathBuf, reason: String },
    #[error("Unrecognised timestamp: {0:?}")]
    UnparseableTimestamp(String),
    #[error("FFmpeg exited with {}", exit_code_label(.exit_code))]
    TranscodeFailed { exit_code: Option<i32> },
    #[error("Failed to spawn {}: {source}", .program.display())]
    SpawnFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to delete {}: {source}", .path.display())]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("FFmpeg not found at {}. Please install FFmpeg or add it to PATH", .0.display())]
    ToolNotFound(PathBuf),
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
