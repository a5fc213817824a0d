//! MP4 Batch Converter Library
//!
//! Converts every legacy video file in a folder tree to MP4 with FFmpeg,
//! with an egui front end showing overall and per-file progress.

pub mod app;
pub mod config;
pub mod converter;

// Re-export commonly used types
pub use app::ConverterApp;
pub use config::ConverterConfig;
pub use converter::{BatchController, BatchState, ConvertError, EncodingOptions};
