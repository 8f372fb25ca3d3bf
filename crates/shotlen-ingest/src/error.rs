use std::fmt;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("missing input: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("malformed document: {0}")]
    MalformedDocument(String),
}

/// Why a single shot was dropped. Rejections never abort a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRejection {
    MissingDuration,
    NonPositiveDuration,
    BadTimecode,
    UnrecognizedShape,
}

impl RecordRejection {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordRejection::MissingDuration => "missing_duration",
            RecordRejection::NonPositiveDuration => "non_positive_duration",
            RecordRejection::BadTimecode => "bad_timecode",
            RecordRejection::UnrecognizedShape => "unrecognized_shape",
        }
    }
}

impl fmt::Display for RecordRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rejections {
    pub missing_duration: usize,
    pub non_positive_duration: usize,
    pub bad_timecode: usize,
    pub unrecognized_shape: usize,
}

impl Rejections {
    pub fn record(&mut self, rejection: RecordRejection) {
        match rejection {
            RecordRejection::MissingDuration => self.missing_duration += 1,
            RecordRejection::NonPositiveDuration => self.non_positive_duration += 1,
            RecordRejection::BadTimecode => self.bad_timecode += 1,
            RecordRejection::UnrecognizedShape => self.unrecognized_shape += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.missing_duration
            + self.non_positive_duration
            + self.bad_timecode
            + self.unrecognized_shape
    }
}
