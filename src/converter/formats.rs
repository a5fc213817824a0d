//! Input formats, output naming and encoding options.

use std::path::{Path, PathBuf};

/// Input extensions picked up by the folder scan.
pub const SUPPORTED_INPUT_EXTENSIONS: &[&str] = &["mov", "avi", "rmvb", "mkv", "flv"];

/// Extension given to every converted file.
pub const OUTPUT_EXTENSION: &str = "mp4";

/// Audio codec used for every conversion.
pub const AUDIO_CODEC: &str = "aac";

/// Video encoders offered for the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoCodec {
    /// H.264 via libx264, plays almost everywhere
    #[default]
    H264,
    /// H.265 via libx265, smaller files at the same quality
    H265,
}

impl VideoCodec {
    /// Returns the FFmpeg encoder name.
    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "libx264",
            VideoCodec::H265 => "libx265",
        }
    }

    /// All available codecs.
    pub fn all() -> &'static [VideoCodec] {
        &[VideoCodec::H264, VideoCodec::H265]
    }
}

/// x264/x265 speed presets, fastest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedPreset {
    UltraFast,
    SuperFast,
    VeryFast,
    Faster,
    #[default]
    Fast,
    Medium,
    Slow,
    Slower,
    VerySlow,
}

impl SpeedPreset {
    /// Returns the value passed to `-preset`.
    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            SpeedPreset::UltraFast => "ultrafast",
            SpeedPreset::SuperFast => "superfast",
            SpeedPreset::VeryFast => "veryfast",
            SpeedPreset::Faster => "faster",
            SpeedPreset::Fast => "fast",
            SpeedPreset::Medium => "medium",
            SpeedPreset::Slow => "slow",
            SpeedPreset::Slower => "slower",
            SpeedPreset::VerySlow => "veryslow",
        }
    }

    /// All available presets.
    pub fn all() -> &'static [SpeedPreset] {
        &[
            SpeedPreset::UltraFast,
            SpeedPreset::SuperFast,
            SpeedPreset::VeryFast,
            SpeedPreset::Faster,
            SpeedPreset::Fast,
            SpeedPreset::Medium,
            SpeedPreset::Slow,
            SpeedPreset::Slower,
            SpeedPreset::VerySlow,
        ]
    }
}

/// Encoder settings applied to every file in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingOptions {
    pub codec: VideoCodec,
    pub preset: SpeedPreset,
    /// Constant rate factor. Lower is better quality, larger files.
    pub crf: u8,
}

impl EncodingOptions {
    /// CRF range accepted by libx264 and libx265 for 8-bit input.
    pub const CRF_RANGE: std::ops::RangeInclusive<u8> = 0..=51;
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self {
            codec: VideoCodec::default(),
            preset: SpeedPreset::default(),
            crf: 23,
        }
    }
}

/// Check if a path has one of the given extensions, ignoring case.
pub fn has_extension_in(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            extensions.iter().any(|e| e.trim_start_matches('.') == ext_lower)
        })
        .unwrap_or(false)
}

/// Output path for a converted file: same location, extension replaced.
pub fn output_path_for(input: &Path, output_extension: &str) -> PathBuf {
    input.with_extension(output_extension.trim_start_matches('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow_list() -> Vec<String> {
        SUPPORTED_INPUT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_codec_names() {
        assert_eq!(VideoCodec::H264.ffmpeg_name(), "libx264");
        assert_eq!(VideoCodec::H265.ffmpeg_name(), "libx265");
    }

    #[test]
    fn test_default_options() {
        let options = EncodingOptions::default();
        assert_eq!(options.codec, VideoCodec::H264);
        assert_eq!(options.preset.ffmpeg_name(), "fast");
        assert_eq!(options.crf, 23);
    }

    #[test]
    fn test_supported_extensions() {
        let exts = allow_list();
        assert!(has_extension_in(Path::new("/v/a.mkv"), &exts));
        assert!(has_extension_in(Path::new("/v/a.MOV"), &exts));
        assert!(has_extension_in(Path::new("/v/clip.RmVb"), &exts));
        assert!(!has_extension_in(Path::new("/v/a.mp4"), &exts));
        assert!(!has_extension_in(Path::new("/v/notes.txt"), &exts));
        assert!(!has_extension_in(Path::new("/v/mkv"), &exts));
    }

    #[test]
    fn test_dotted_allow_list_entries() {
        let exts = vec![".flv".to_string()];
        assert!(has_extension_in(Path::new("old.FLV"), &exts));
    }

    #[test]
    fn test_output_path_for() {
        assert_eq!(
            output_path_for(Path::new("/videos/holiday.avi"), OUTPUT_EXTENSION),
            PathBuf::from("/videos/holiday.mp4")
        );
        assert_eq!(
            output_path_for(Path::new("/videos/my.show.s01.mkv"), ".mp4"),
            PathBuf::from("/videos/my.show.s01.mp4")
        );
    }
}
