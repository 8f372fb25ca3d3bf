use crate::timecode::LogTimestamp;
use serde::{Deserialize, Serialize};

/// One shot recovered from a hand-scraped log.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotRecord {
    pub movie_title: String,
    pub shot_number: u32,
    pub start_timestamp: String,
    pub duration_seconds: f64,
}

impl ShotRecord {
    pub fn start_seconds(&self) -> Option<f64> {
        LogTimestamp::parse(&self.start_timestamp)
            .ok()
            .map(|timestamp| timestamp.seconds())
    }
}

/// One shot from the bulk corpus. `duration_seconds` is always positive.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusShotRecord {
    pub movie_id: String,
    pub duration_seconds: f64,
}

/// Row of the normalized shot table shared by every dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotRow {
    #[serde(alias = "movie_id")]
    pub movie_title: String,
    #[serde(default)]
    pub shot_number: Option<u32>,
    #[serde(default, alias = "start_time")]
    pub start_timestamp: Option<String>,
    #[serde(alias = "duration", alias = "shot_length_sec")]
    pub duration_seconds: f64,
}

impl ShotRow {
    pub const HEADER: [&'static str; 4] = [
        "movie_title",
        "shot_number",
        "start_timestamp",
        "duration_seconds",
    ];

    pub fn new(movie_title: impl Into<String>, duration_seconds: f64) -> Self {
        Self {
            movie_title: movie_title.into(),
            shot_number: None,
            start_timestamp: None,
            duration_seconds,
        }
    }
}

impl From<ShotRecord> for ShotRow {
    fn from(record: ShotRecord) -> Self {
        Self {
            movie_title: record.movie_title,
            shot_number: Some(record.shot_number),
            start_timestamp: Some(record.start_timestamp),
            duration_seconds: record.duration_seconds,
        }
    }
}

impl From<CorpusShotRecord> for ShotRow {
    fn from(record: CorpusShotRecord) -> Self {
        Self::new(record.movie_id, record.duration_seconds)
    }
}
