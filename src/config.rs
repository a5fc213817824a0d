//! Startup configuration: where FFmpeg lives and which files to convert.

use std::path::{Path, PathBuf};

use crate::converter::formats::{EncodingOptions, OUTPUT_EXTENSION, SUPPORTED_INPUT_EXTENSIONS};

/// Built once at startup and handed to the controller.
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Path to FFmpeg binary
    pub ffmpeg_path: PathBuf,
    /// Path to FFprobe binary
    pub ffprobe_path: PathBuf,
    /// Lower-case input extensions, without the dot
    pub input_extensions: Vec<String>,
    /// Extension of converted files, without the dot
    pub output_extension: String,
    /// Encoder settings the UI starts with
    pub default_options: EncodingOptions,
}

impl ConverterConfig {
    /// Locate FFmpeg and FFprobe for this machine.
    pub fn discover() -> Self {
        let ffmpeg_path = find_ffmpeg();
        let ffprobe_path = ffprobe_next_to(&ffmpeg_path);
        log::info!("FFmpeg: {:?}, FFprobe: {:?}", ffmpeg_path, ffprobe_path);
        Self::with_tools(ffmpeg_path, ffprobe_path)
    }

    /// Configuration with explicit tool paths and default everything else.
    pub fn with_tools(ffmpeg_path: PathBuf, ffprobe_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            ffprobe_path,
            input_extensions: SUPPORTED_INPUT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            output_extension: OUTPUT_EXTENSION.to_string(),
            default_options: EncodingOptions::default(),
        }
    }
}

/// Well-known install locations, checked before `PATH`.
fn well_known_ffmpeg_paths() -> Vec<&'static str> {
    if cfg!(target_os = "windows") {
        vec![]
    } else {
        vec![
            "/usr/local/bin/ffmpeg",    // Intel Mac (Homebrew)
            "/opt/homebrew/bin/ffmpeg", // Apple Silicon Mac (Homebrew)
            "/usr/bin/ffmpeg",          // Linux packages
        ]
    }
}

/// Used when neither a known location nor `PATH` has FFmpeg.
fn fallback_ffmpeg_path() -> PathBuf {
    if cfg!(target_os = "windows") {
        PathBuf::from("C:\\ffmpeg\\bin\\ffmpeg.exe")
    } else {
        PathBuf::from("ffmpeg")
    }
}

/// Find FFmpeg binary in various locations.
fn find_ffmpeg() -> PathBuf {
    // 1. Check common install locations
    if let Some(path) = well_known_ffmpeg_paths()
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
    {
        return path;
    }

    // 2. Check system PATH using which crate
    if let Ok(path) = which::which("ffmpeg") {
        return path;
    }

    // 3. Hardcoded fallback; availability is checked when a run starts
    fallback_ffmpeg_path()
}

/// FFprobe ships next to FFmpeg, so swap the file name.
pub fn ffprobe_next_to(ffmpeg: &Path) -> PathBuf {
    let probe_name = match ffmpeg.file_name().and_then(|n| n.to_str()) {
        Some(name) if name.contains("ffmpeg") => name.replacen("ffmpeg", "ffprobe", 1),
        _ => {
            if cfg!(target_os = "windows") {
                "ffprobe.exe".to_string()
            } else {
                "ffprobe".to_string()
            }
        }
    };
    ffmpeg.with_file_name(probe_name)
}
