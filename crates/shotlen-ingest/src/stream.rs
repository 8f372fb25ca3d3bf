use crate::corpus::{CorpusNormalizer, NormalizeOutcome};
use crate::error::IngestError;
use serde::Deserialize;
use serde_json::Value;
use std::io::BufRead;
use tracing::{debug, info, warn};

pub const DEFAULT_STREAM_CAP: usize = 20_000;

/// One line of a streamed corpus: a movie and its flat shot list.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamEntry {
    #[serde(alias = "movie_title", alias = "movie_id", default = "unknown_movie")]
    pub movie_name: String,
    #[serde(default)]
    pub shots: Option<Vec<Value>>,
}

fn unknown_movie() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamOutcome {
    pub normalized: NormalizeOutcome,
    pub movies_skipped: usize,
    pub capped: bool,
}

/// Lazily decodes JSON lines; blank lines are ignored. Only lines that are not
/// JSON at all are errors here, shape checks happen per entry.
pub fn json_lines<R: BufRead>(reader: R) -> impl Iterator<Item = Result<Value, IngestError>> {
    reader.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(serde_json::from_str::<Value>(&line).map_err(|err| {
            IngestError::UpstreamFetch(format!("undecodable stream entry: {err}"))
        })),
        Err(err) => Some(Err(IngestError::UpstreamFetch(format!(
            "stream read failed: {err}"
        )))),
    })
}

/// Normalizes a stream until it is exhausted or `cap` shots were collected.
///
/// Entries without a usable shot list are skipped and not counted as
/// processed. A read failure or a non-JSON line aborts the whole stage;
/// nothing collected so far is returned.
pub fn normalize_stream<I>(
    entries: I,
    normalizer: &CorpusNormalizer,
    cap: usize,
) -> Result<StreamOutcome, IngestError>
where
    I: IntoIterator<Item = Result<Value, IngestError>>,
{
    let mut outcome = StreamOutcome::default();
    for value in entries {
        let value = value?;
        let entry = match StreamEntry::deserialize(&value) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "stream entry has an unexpected shape, skipping");
                outcome.movies_skipped += 1;
                continue;
            }
        };
        let shots = match entry.shots {
            Some(shots) if !shots.is_empty() => shots,
            _ => {
                debug!(movie = %entry.movie_name, "stream entry has no shots");
                outcome.movies_skipped += 1;
                continue;
            }
        };
        outcome.normalized.movies += 1;
        normalizer.push_shots(
            &entry.movie_name,
            &shots,
            Some(cap),
            &mut outcome.normalized,
        );
        if outcome.normalized.records.len() >= cap {
            info!(cap, "stream cap reached, stopping early");
            outcome.capped = true;
            break;
        }
    }
    Ok(outcome)
}
