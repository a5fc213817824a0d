//! FFmpeg wrapper for video conversion.

use std::ffi::OsString;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::error::ConvertError;
use super::formats::{EncodingOptions, AUDIO_CODEC};

/// The external tool pair used for conversion.
pub trait Transcoder {
    /// Make sure the tool can be launched at all.
    fn check_available(&self) -> Result<(), ConvertError>;

    /// Media duration of `input` in seconds.
    fn probe_duration(&self, input: &Path) -> Result<f64, ConvertError>;

    /// Encode `input` into `output`, handing every diagnostic line to
    /// `on_line` as it is produced. Returns once the process has exited.
    fn transcode(
        &self,
        input: &Path,
        output: &Path,
        options: &EncodingOptions,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<(), ConvertError>;
}

/// FFmpeg/FFprobe command-line wrapper.
#[derive(Debug, Clone)]
pub struct FFmpegWrapper {
    /// Path to FFmpeg binary
    ffmpeg_path: PathBuf,
    /// Path to FFprobe binary (for duration lookup)
    ffprobe_path: PathBuf,
}

impl FFmpegWrapper {
    pub fn new(ffmpeg_path: PathBuf, ffprobe_path: PathBuf) -> Self {
        log::debug!("Using FFmpeg at {:?}, FFprobe at {:?}", ffmpeg_path, ffprobe_path);
        Self {
            ffmpeg_path,
            ffprobe_path,
        }
    }

    /// Arguments for one conversion, without the program name.
    pub fn conversion_args(input: &Path, output: &Path, options: &EncodingOptions) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-i".into(), input.into()];
        args.extend(
            [
                "-c:v",
                options.codec.ffmpeg_name(),
                "-preset",
                options.preset.ffmpeg_name(),
                "-crf",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(options.crf.to_string().into());
        args.extend(["-c:a", AUDIO_CODEC].into_iter().map(OsString::from));
        args.push(output.into());
        args
    }

    /// Parse FFprobe's bare `format=duration` output.
    pub fn parse_duration_output(input: &Path, stdout: &str) -> Result<f64, ConvertError> {
        let text = stdout.trim();
        let unavailable = |reason: String| ConvertError::DurationUnavailable {
            path: input.to_path_buf(),
            reason,
        };

        if text.is_empty() {
            return Err(unavailable("FFprobe returned no duration".to_string()));
        }
        if text.eq_ignore_ascii_case("n/a") {
            return Err(unavailable("FFprobe reported N/A".to_string()));
        }

        match text.parse::<f64>() {
            Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(secs),
            _ => Err(unavailable(format!("invalid duration {text:?}"))),
        }
    }

    fn is_launchable(path: &Path) -> bool {
        path.is_file() || which::which(path).is_ok()
    }
}

impl Transcoder for FFmpegWrapper {
    fn check_available(&self) -> Result<(), ConvertError> {
        if !Self::is_launchable(&self.ffmpeg_path) {
            return Err(ConvertError::ToolNotFound(self.ffmpeg_path.clone()));
        }
        if !Self::is_launchable(&self.ffprobe_path) {
            return Err(ConvertError::ToolNotFound(self.ffprobe_path.clone()));
        }
        Ok(())
    }

    fn probe_duration(&self, input: &Path) -> Result<f64, ConvertError> {
        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v", "error",
                "-show_entries", "format=duration",
                "-of", "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(input)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ConvertError::DurationUnavailable {
                path: input.to_path_buf(),
                reason: format!("failed to run FFprobe: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::warn!("FFprobe failed for {:?}: {}", input, stderr.trim());
            return Err(ConvertError::DurationUnavailable {
                path: input.to_path_buf(),
                reason: format!("FFprobe exited with {:?}", output.status.code()),
            });
        }

        Self::parse_duration_output(input, &String::from_utf8_lossy(&output.stdout))
    }

    fn transcode(
        &self,
        input: &Path,
        output: &Path,
        options: &EncodingOptions,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<(), ConvertError> {
        let args = Self::conversion_args(input, output, options);
        log::debug!("Running {:?} {:?}", self.ffmpeg_path, args);

        let mut child = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ConvertError::SpawnFailed {
                program: self.ffmpeg_path.clone(),
                source,
            })?;

        if let Some(stderr) = child.stderr.take() {
            if let Err(e) = for_each_line(BufReader::new(stderr), on_line) {
                log::warn!("Lost FFmpeg output for {:?}: {}", input, e);
            }
        }

        let status = child.wait().map_err(|source| ConvertError::SpawnFailed {
            program: self.ffmpeg_path.clone(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(ConvertError::TranscodeFailed {
                exit_code: status.code(),
            })
        }
    }
}

/// Feed `reader` to `on_line` one line at a time until EOF.
///
/// FFmpeg redraws its stats line with `\r`, so both `\r` and `\n` end a line.
/// Empty lines are dropped and invalid UTF-8 is replaced.
pub fn for_each_line<R: BufRead>(mut reader: R, on_line: &mut dyn FnMut(&str)) -> io::Result<()> {
    let mut pending: Vec<u8> = Vec::new();

    loop {
        let consumed = {
            let buf = match reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if buf.is_empty() {
                break;
            }

            for &byte in buf {
                if byte == b'\n' || byte == b'\r' {
                    if !pending.is_empty() {
                        on_line(&*String::from_utf8_lossy(&pending));
                        pending.clear();
                    }
                } else {
                    pending.push(byte);
                }
            }
            buf.len()
        };
        reader.consume(consumed);
    }

    if !pending.is_empty() {
        on_line(&*String::from_utf8_lossy(&pending));
    }
    Ok(())
}
