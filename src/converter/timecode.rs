//! Parsing of the `time=` samples FFmpeg prints while encoding.

use super::error::ConvertError;

/// Marker FFmpeg places before the current output position.
const TIME_MARKER: &str = "time=";

/// Value FFmpeg prints when it has no position yet.
const NOT_AVAILABLE: &str = "N/A";

/// Extract the raw timestamp token following `time=` in a diagnostic line.
pub fn extract_time_sample(line: &str) -> Option<&str> {
    let start = line.find(TIME_MARKER)? + TIME_MARKER.len();
    let rest = &line[start..];
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Convert `H:MM:SS.ms`, `MM:SS.ms` or `SS.ms` to seconds.
///
/// A leading `-` is accepted; FFmpeg prints negative times while the encoder
/// is still filling its B-frame delay. Callers clamp the result.
///
/// Returns `Ok(None)` for `N/A`, which some inputs (e.g. QuickTime preview
/// files) report for the whole encode. Those samples are simply skipped.
pub fn parse_timestamp(value: &str) -> Result<Option<f64>, ConvertError> {
    let value = value.trim();
    if value == NOT_AVAILABLE {
        return Ok(None);
    }

    let unparseable = || ConvertError::UnparseableTimestamp(value.to_string());
    let whole = |part: &str| part.parse::<u32>().map(f64::from).map_err(|_| unparseable());
    let fractional = |part: &str| {
        part.parse::<f64>()
            .ok()
            .filter(|s| s.is_finite() && *s >= 0.0)
            .ok_or_else(unparseable)
    };

    let (sign, magnitude) = match value.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, value),
    };

    let parts: Vec<&str> = magnitude.split(':').collect();
    let seconds = match parts.as_slice() {
        [h, m, s] => whole(h)? * 3600.0 + whole(m)? * 60.0 + fractional(s)?,
        [m, s] => whole(m)? * 60.0 + fractional(s)?,
        [s] => fractional(s)?,
        _ => return Err(unparseable()),
    };
    Ok(Some(sign * seconds))
}
