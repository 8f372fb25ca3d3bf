//! Shot recovery from accessibility-tree text dumps of the shot-log web UI.
//!
//! Parsing is split in two policies. The tokenizer decides what is noise: it
//! turns labeled lines into a flat value stream and drops UI chrome. The
//! scanner decides what is a shot: a window of three consecutive values shaped
//! `(shot number, MM:SS.d, seconds)`.

use crate::model::ShotRecord;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

pub const DEFAULT_SHOT_NUMBER_CEILING: u32 = 10_000;

/// Labels rendered by the web UI around the shot table.
pub const UI_CHROME: &[&str] = &[
    "Close",
    "Back",
    "NoS",
    "LEN",
    "ASL",
    "MSL",
    "MAX",
    "MIN",
    "Range",
    "StDev",
    "CV",
    "Show raw data",
    "Hide colors",
    "Show colors",
];

const REFERENCE_MARKER: &str = "ref=";
const WINDOW: usize = 3;

static LABELED_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"- generic.*: "?([^"]+)"?"#).expect("valid regex"));
static SHOT_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));
static LOG_TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}\.\d$").expect("valid regex"));
static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.?\d*$").expect("valid regex"));

/// Value carried by a `- generic [...]: value` line, quotes stripped.
pub fn extract_value(line: &str) -> Option<&str> {
    LABELED_VALUE_RE
        .captures(line.trim())
        .and_then(|caps| caps.get(1))
        .map(|value| value.as_str())
}

pub fn is_noise(value: &str) -> bool {
    UI_CHROME.contains(&value) || value.contains(REFERENCE_MARKER)
}

pub fn tokenize(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(extract_value)
        .filter(|value| !is_noise(value))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Seeking,
    Matching,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogParse {
    pub shots: Vec<ShotRecord>,
    /// Windows rejected with a single-step advance.
    pub skipped_tokens: usize,
    /// Times an aligned run of triples was broken.
    pub alignment_breaks: usize,
    /// Accepted shots whose number is lower than the previous one.
    pub out_of_order: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct LogParser {
    shot_number_ceiling: u32,
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new(DEFAULT_SHOT_NUMBER_CEILING)
    }
}

impl LogParser {
    pub fn new(shot_number_ceiling: u32) -> Self {
        Self {
            shot_number_ceiling,
        }
    }

    pub fn parse(&self, movie_title: &str, content: &str) -> LogParse {
        let tokens = tokenize(content);
        debug!(movie = movie_title, tokens = tokens.len(), "tokenized log");
        self.scan(movie_title, &tokens)
    }

    /// Accepts a window as a shot: `(number, start, duration)`.
    pub fn accept<'a>(&self, window: &'a [String]) -> Option<(u32, &'a str, f64)> {
        let [number, start, duration] = window else {
            return None;
        };
        if !SHOT_NUMBER_RE.is_match(number)
            || !LOG_TIMESTAMP_RE.is_match(start)
            || !DURATION_RE.is_match(duration)
        {
            return None;
        }
        let number = number.parse::<u32>().ok()?;
        if number >= self.shot_number_ceiling {
            return None;
        }
        let duration = duration.parse::<f64>().ok()?;
        Some((number, start.as_str(), duration))
    }

    pub fn scan(&self, movie_title: &str, tokens: &[String]) -> LogParse {
        let mut parse = LogParse::default();
        let mut state = ScanState::Seeking;
        let mut last_number: Option<u32> = None;
        let mut index = 0;

        while index + WINDOW <= tokens.len() {
            match self.accept(&tokens[index..index + WINDOW]) {
                Some((number, start, duration)) => {
                    if last_number.is_some_and(|last| number < last) {
                        parse.out_of_order += 1;
                    }
                    last_number = Some(number);
                    parse.shots.push(ShotRecord {
                        movie_title: movie_title.to_string(),
                        shot_number: number,
                        start_timestamp: start.to_string(),
                        duration_seconds: duration,
                    });
                    state = ScanState::Matching;
                    index += WINDOW;
                }
                None => {
                    if state == ScanState::Matching {
                        parse.alignment_breaks += 1;
                    }
                    state = ScanState::Seeking;
                    parse.skipped_tokens += 1;
                    index += 1;
                }
            }
        }

        if parse.out_of_order > 0 {
            warn!(
                movie = movie_title,
                out_of_order = parse.out_of_order,
                "shot numbers decrease in log"
            );
        }
        parse
    }
}

pub fn parse_log(content: &str, movie_title: &str) -> Vec<ShotRecord> {
    LogParser::default().parse(movie_title, content).shots
}
