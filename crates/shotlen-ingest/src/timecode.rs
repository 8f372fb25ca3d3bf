use crate::error::RecordRejection;
use std::fmt;

/// `MM:SS.d` start timestamp as printed by the shot-log web UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogTimestamp {
    tenths: u64,
}

impl LogTimestamp {
    pub fn parse(value: &str) -> Result<Self, String> {
        let (minutes, rest) = value
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("log timestamp missing ':' separator: {value}"))?;
        let (seconds, tenths) = rest
            .split_once('.')
            .ok_or_else(|| format!("log timestamp missing tenths: {value}"))?;
        let minutes = parse_digits(minutes, value)?;
        let seconds = parse_digits(seconds, value)?;
        let tenths = parse_digits(tenths, value)?;
        if seconds >= 60 || tenths >= 10 {
            return Err(format!("log timestamp out of range: {value}"));
        }
        let tenths = minutes
            .checked_mul(600)
            .and_then(|total| total.checked_add(seconds * 10 + tenths))
            .ok_or_else(|| format!("log timestamp out of range: {value}"))?;
        Ok(Self { tenths })
    }

    pub fn seconds(&self) -> f64 {
        self.tenths as f64 / 10.0
    }
}

impl fmt::Display for LogTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tenths = self.tenths % 10;
        let total_secs = self.tenths / 10;
        write!(f, "{:02}:{:02}.{tenths}", total_secs / 60, total_secs % 60)
    }
}

/// `HH.MM.SS.mmm` timecode embedded in bulk-corpus shot descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CorpusTimecode {
    millis: u64,
}

impl CorpusTimecode {
    pub fn parse(value: &str) -> Result<Self, String> {
        let parts: Vec<&str> = value.trim().split('.').collect();
        if parts.len() != 4 {
            return Err(format!("corpus timecode needs 4 segments: {value}"));
        }
        let hours = parse_digits(parts[0], value)?;
        let minutes = parse_digits(parts[1], value)?;
        let seconds = parse_digits(parts[2], value)?;
        let millis = parse_digits(parts[3], value)?;
        let millis = hours
            .checked_mul(3600)
            .and_then(|total| total.checked_add(minutes.checked_mul(60)?))
            .and_then(|total| total.checked_add(seconds))
            .and_then(|total| total.checked_mul(1000))
            .and_then(|total| total.checked_add(millis))
            .ok_or_else(|| format!("corpus timecode out of range: {value}"))?;
        Ok(Self { millis })
    }

    pub fn seconds(&self) -> f64 {
        self.millis as f64 / 1000.0
    }
}

impl fmt::Display for CorpusTimecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.millis % 1000;
        let total_secs = self.millis / 1000;
        let secs = total_secs % 60;
        let total_mins = total_secs / 60;
        write!(f, "{:02}.{:02}.{secs:02}.{ms:03}", total_mins / 60, total_mins % 60)
    }
}

/// Duration between two corpus timecodes. `end <= start` is a rejected record.
pub fn derive_duration(start: &str, end: &str) -> Result<f64, RecordRejection> {
    let start = CorpusTimecode::parse(start).map_err(|_| RecordRejection::BadTimecode)?;
    let end = CorpusTimecode::parse(end).map_err(|_| RecordRejection::BadTimecode)?;
    if end <= start {
        return Err(RecordRejection::NonPositiveDuration);
    }
    Ok((end.millis - start.millis) as f64 / 1000.0)
}

fn parse_digits(part: &str, value: &str) -> Result<u64, String> {
    if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(format!("invalid timecode segment {part:?} in {value}"));
    }
    part.parse::<u64>()
        .map_err(|err| format!("invalid timecode segment {part:?} in {value}: {err}"))
}
