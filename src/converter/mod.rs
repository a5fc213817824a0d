//! MP4 Batch Converter Module
//!
//! Scans a folder for legacy video files and converts each one to MP4
//! using the FFmpeg CLI, one file at a time.

pub mod controller;
pub mod convert;
pub mod error;
pub mod ffmpeg;
pub mod formats;
pub mod job;
pub mod scanner;
pub mod surface;
pub mod timecode;
pub mod worker;

#[cfg(test)]
mod testing;

pub use controller::{BatchController, BatchState, RunSummary};
pub use error::ConvertError;
pub use ffmpeg::{FFmpegWrapper, Transcoder};
pub use formats::{EncodingOptions, SpeedPreset, VideoCodec};
pub use surface::{PresentationSurface, UiEvent};
pub use worker::BatchWorker;
