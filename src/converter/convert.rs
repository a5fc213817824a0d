//! Converting a single file with live per-file progress.

use std::path::Path;

use super::error::ConvertError;
use super::ffmpeg::Transcoder;
use super::formats::EncodingOptions;
use super::surface::PresentationSurface;
use super::timecode::{extract_time_sample, parse_timestamp};

/// Tracks the output position of one encode against its probed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct FileProgress {
    duration: f64,
    position: f64,
    tracking: bool,
}

impl FileProgress {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            position: 0.0,
            tracking: true,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Feed one diagnostic line. Returns the new position when it changed.
    ///
    /// `N/A` samples are ignored. The first unparseable sample stops
    /// tracking for the rest of the file; the encode itself carries on.
    pub fn observe(&mut self, line: &str) -> Option<f64> {
        if !self.tracking {
            return None;
        }
        let sample = extract_time_sample(line)?;

        match parse_timestamp(sample) {
            Ok(Some(seconds)) => {
                self.position = seconds.clamp(0.0, self.duration);
                Some(self.position)
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("{}; progress tracking disabled for this file", e);
                self.tracking = false;
                None
            }
        }
    }

    /// Mark the encode as finished.
    pub fn complete(&mut self) -> f64 {
        self.position = self.duration;
        self.position
    }
}

/// Probe, then transcode `input` into `output`, pushing per-file progress.
///
/// The transcoder is never started when the duration probe fails.
pub fn convert_file<T, S>(
    transcoder: &T,
    input: &Path,
    output: &Path,
    options: &EncodingOptions,
    surface: &mut S,
) -> Result<(), ConvertError>
where
    T: Transcoder + ?Sized,
    S: PresentationSurface + ?Sized,
{
    let duration = transcoder.probe_duration(input)?;
    log::debug!("{:?}: duration {:.2}s", input, duration);

    let mut progress = FileProgress::new(duration);
    surface.set_file_max(progress.duration());
    surface.set_file(0.0);

    transcoder.transcode(input, output, options, &mut |line: &str| {
        if let Some(position) = progress.observe(line) {
            surface.set_file(position);
        }
    })?;

    surface.set_file(progress.complete());
    Ok(())
}
