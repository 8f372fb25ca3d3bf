//! Flattening of the bulk annotation corpus into per-shot durations.
//!
//! Shot descriptors are decoded as untagged variants tried in order; the first
//! shape that decodes wins and anything else is dropped as a rejected record.
//! A movie's layout is chosen by which of its keys hold lists.

use crate::error::{IngestError, RecordRejection, Rejections};
use crate::model::{CorpusShotRecord, ShotRow};
use crate::timecode::derive_duration;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::debug;

pub const DEFAULT_FRAME_RATE: f64 = 24.0;

static TIMECODE_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_(\d{2}\.\d{2}\.\d{2}\.\d{3})-(\d{2}\.\d{2}\.\d{2}\.\d{3})$")
        .expect("valid regex")
});

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ShotDescriptor {
    Explicit {
        #[serde(alias = "shot_duration")]
        duration: f64,
        #[serde(default)]
        start: Option<f64>,
        #[serde(default)]
        end: Option<f64>,
    },
    Span {
        start: f64,
        end: f64,
    },
    Frames {
        shot_start_frame: f64,
        shot_end_frame: f64,
    },
    Embedded(String),
}

impl ShotDescriptor {
    pub fn decode(value: &Value) -> Result<Self, RecordRejection> {
        ShotDescriptor::deserialize(value).map_err(|_| RecordRejection::UnrecognizedShape)
    }

    pub fn duration_seconds(&self, frame_rate: f64) -> Result<f64, RecordRejection> {
        let duration = match self {
            ShotDescriptor::Explicit {
                duration,
                start,
                end,
            } => {
                if *duration > 0.0 {
                    *duration
                } else {
                    match (start, end) {
                        (Some(start), Some(end)) => end - start,
                        _ => return Err(RecordRejection::NonPositiveDuration),
                    }
                }
            }
            ShotDescriptor::Span { start, end } => end - start,
            ShotDescriptor::Frames {
                shot_start_frame,
                shot_end_frame,
            } => (shot_end_frame - shot_start_frame) / frame_rate,
            ShotDescriptor::Embedded(descriptor) => return embedded_duration(descriptor),
        };
        if duration.is_finite() && duration > 0.0 {
            Ok(duration)
        } else {
            Err(RecordRejection::NonPositiveDuration)
        }
    }
}

/// Duration encoded by a `..._HH.MM.SS.mmm-HH.MM.SS.mmm` descriptor suffix.
pub fn embedded_duration(descriptor: &str) -> Result<f64, RecordRejection> {
    let caps = TIMECODE_PAIR_RE
        .captures(descriptor)
        .ok_or(RecordRejection::MissingDuration)?;
    derive_duration(&caps[1], &caps[2])
}

#[derive(Debug)]
enum MovieLayout<'a> {
    Shots(&'a [Value]),
    Scenes(Vec<SceneBlock>),
    SceneMap(&'a Map<String, Value>),
}

impl<'a> MovieLayout<'a> {
    /// `shots` and `scene` only select their layouts when they are the single
    /// list-valued key; otherwise every list is a named scene.
    fn decode(value: &'a Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };
        let lists = map.values().filter(|value| value.is_array()).count();
        if lists == 1 {
            if let Some(Value::Array(shots)) = map.get("shots") {
                return Some(MovieLayout::Shots(shots));
            }
            if let Some(scene) = map.get("scene") {
                if let Ok(blocks) = Vec::<SceneBlock>::deserialize(scene) {
                    return Some(MovieLayout::Scenes(blocks));
                }
            }
        }
        Some(MovieLayout::SceneMap(map))
    }
}

#[derive(Debug, Deserialize)]
struct SceneBlock {
    #[serde(default)]
    shots: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeOutcome {
    pub records: Vec<CorpusShotRecord>,
    pub movies: usize,
    pub rejections: Rejections,
}

impl NormalizeOutcome {
    pub fn rows(&self) -> Vec<ShotRow> {
        self.records.iter().cloned().map(ShotRow::from).collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CorpusNormalizer {
    frame_rate: f64,
}

impl Default for CorpusNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_RATE)
    }
}

impl CorpusNormalizer {
    pub fn new(frame_rate: f64) -> Self {
        Self { frame_rate }
    }

    pub fn shot_duration(&self, value: &Value) -> Result<f64, RecordRejection> {
        ShotDescriptor::decode(value)?.duration_seconds(self.frame_rate)
    }

    /// Appends the accepted shots of one movie and returns how many were kept.
    pub fn push_shots(
        &self,
        movie_id: &str,
        shots: &[Value],
        limit: Option<usize>,
        outcome: &mut NormalizeOutcome,
    ) -> usize {
        let mut kept = 0;
        for shot in shots {
            if limit.is_some_and(|limit| outcome.records.len() >= limit) {
                break;
            }
            match self.shot_duration(shot) {
                Ok(duration_seconds) => {
                    outcome.records.push(CorpusShotRecord {
                        movie_id: movie_id.to_string(),
                        duration_seconds,
                    });
                    kept += 1;
                }
                Err(rejection) => {
                    debug!(movie = movie_id, %rejection, "dropped corpus shot");
                    outcome.rejections.record(rejection);
                }
            }
        }
        kept
    }

    pub fn normalize_movie(&self, movie_id: &str, layout: &Value, outcome: &mut NormalizeOutcome) {
        let Some(layout) = MovieLayout::decode(layout) else {
            debug!(movie = movie_id, "movie entry has no recognizable shot layout");
            return;
        };
        outcome.movies += 1;
        match layout {
            MovieLayout::Shots(shots) => {
                self.push_shots(movie_id, shots, None, outcome);
            }
            MovieLayout::Scenes(blocks) => {
                for block in &blocks {
                    self.push_shots(movie_id, &block.shots, None, outcome);
                }
            }
            MovieLayout::SceneMap(scenes) => {
                for shots in scenes.values() {
                    if let Value::Array(shots) = shots {
                        self.push_shots(movie_id, shots, None, outcome);
                    }
                }
            }
        }
    }

    pub fn normalize_document(&self, document: &Map<String, Value>) -> NormalizeOutcome {
        let mut outcome = NormalizeOutcome::default();
        for (movie_id, layout) in document {
            self.normalize_movie(movie_id, layout, &mut outcome);
        }
        outcome
    }

    /// Corpus rows loaded from a tabular file; non-positive durations are dropped.
    pub fn normalize_rows(&self, rows: Vec<ShotRow>) -> NormalizeOutcome {
        let mut outcome = NormalizeOutcome::default();
        let mut movies = BTreeSet::new();
        for row in rows {
            if !movies.contains(&row.movie_title) {
                movies.insert(row.movie_title.clone());
            }
            if row.duration_seconds.is_finite() && row.duration_seconds > 0.0 {
                outcome.records.push(CorpusShotRecord {
                    movie_id: row.movie_title,
                    duration_seconds: row.duration_seconds,
                });
            } else {
                outcome.rejections.record(RecordRejection::NonPositiveDuration);
            }
        }
        outcome.movies = movies.len();
        outcome
    }
}

pub fn parse_document(src: &str) -> Result<Map<String, Value>, IngestError> {
    match serde_json::from_str::<Value>(src)? {
        Value::Object(document) => Ok(document),
        other => Err(IngestError::MalformedDocument(format!(
            "corpus document must be an object keyed by movie id, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
