use crate::corpus::DEFAULT_FRAME_RATE;
use crate::error::IngestError;
use crate::log_parser::DEFAULT_SHOT_NUMBER_CEILING;
use crate::stream::DEFAULT_STREAM_CAP;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_RUNTIME_FLOOR_MINUTES: f64 = 5.0;
pub const DEFAULT_CEILING_SECONDS: f64 = 20.0;
pub const DEFAULT_STRICT_CEILING_MIN_SHOTS: usize = 50;
pub const DEFAULT_SOFT_CEILING_MIN_SHOTS: usize = 100;
pub const DEFAULT_SOFT_CEILING_RATIO: f64 = 0.99;
pub const DEFAULT_CURVE_MAX_SECONDS: f64 = 60.0;
pub const DEFAULT_CURVE_POINTS: usize = 120;
pub const DEFAULT_BARCODE_WINDOW_SECONDS: f64 = 600.0;

const HERO_TABLE: &str = "real_shots.csv";
const CORPUS_TABLE: &str = "moviebench_shots.csv";
const SCRAPED_TABLE: &str = "scraped_shots.csv";
const CORPUS_DOCUMENT: &str = "movies_scenes.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
    pub log_dirs: Vec<PathBuf>,
    pub plots_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("analysis/data"),
            log_dirs: vec![PathBuf::from("analysis/logs")],
            plots_dir: PathBuf::from("plots"),
            output_dir: PathBuf::from("analysis/output"),
        }
    }
}

impl PathsConfig {
    pub fn hero_table(&self) -> PathBuf {
        self.data_dir.join(HERO_TABLE)
    }

    pub fn corpus_table(&self) -> PathBuf {
        self.data_dir.join(CORPUS_TABLE)
    }

    pub fn scraped_table(&self) -> PathBuf {
        self.data_dir.join(SCRAPED_TABLE)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    pub shot_number_ceiling: u32,
    pub runtime_floor_minutes: f64,
    pub ceiling_seconds: f64,
    pub stream_cap: usize,
    pub strict_ceiling_min_shots: usize,
    pub soft_ceiling_min_shots: usize,
    pub soft_ceiling_ratio: f64,
    pub curve_max_seconds: f64,
    pub curve_points: usize,
    pub barcode_window_seconds: f64,
    pub frame_rate: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            shot_number_ceiling: DEFAULT_SHOT_NUMBER_CEILING,
            runtime_floor_minutes: DEFAULT_RUNTIME_FLOOR_MINUTES,
            ceiling_seconds: DEFAULT_CEILING_SECONDS,
            stream_cap: DEFAULT_STREAM_CAP,
            strict_ceiling_min_shots: DEFAULT_STRICT_CEILING_MIN_SHOTS,
            soft_ceiling_min_shots: DEFAULT_SOFT_CEILING_MIN_SHOTS,
            soft_ceiling_ratio: DEFAULT_SOFT_CEILING_RATIO,
            curve_max_seconds: DEFAULT_CURVE_MAX_SECONDS,
            curve_points: DEFAULT_CURVE_POINTS,
            barcode_window_seconds: DEFAULT_BARCODE_WINDOW_SECONDS,
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), String> {
        if self.shot_number_ceiling == 0 {
            return Err("thresholds.shot_number_ceiling must be positive".to_string());
        }
        if self.stream_cap == 0 {
            return Err("thresholds.stream_cap must be positive".to_string());
        }
        if self.curve_points < 2 {
            return Err("thresholds.curve_points must be at least 2".to_string());
        }
        for (name, value) in [
            ("runtime_floor_minutes", self.runtime_floor_minutes),
            ("ceiling_seconds", self.ceiling_seconds),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("thresholds.{name} must be a non-negative number"));
            }
        }
        for (name, value) in [
            ("curve_max_seconds", self.curve_max_seconds),
            ("barcode_window_seconds", self.barcode_window_seconds),
            ("frame_rate", self.frame_rate),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("thresholds.{name} must be a positive number"));
            }
        }
        if !(self.soft_ceiling_ratio > 0.0 && self.soft_ceiling_ratio <= 1.0) {
            return Err("thresholds.soft_ceiling_ratio must be in (0, 1]".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorpusConfig {
    pub document: PathBuf,
    pub stream_url: Option<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            document: PathsConfig::default().data_dir.join(CORPUS_DOCUMENT),
            stream_url: None,
        }
    }
}

/// Which movies the report singles out.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Hand-scraped movie drawn on the cut barcode.
    pub barcode_movie: String,
    /// Title fragments compared on editorial pace.
    pub pace_movies: Vec<String>,
    pub wasteland_min_seconds: f64,
    pub wasteland_max_seconds: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            barcode_movie: "The Bourne Ultimatum".to_string(),
            pace_movies: vec!["Mad Max".to_string(), "Godfather".to_string()],
            wasteland_min_seconds: 10.0,
            wasteland_max_seconds: 30.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScrapeTarget {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawPipelineConfig {
    paths: PathsConfig,
    thresholds: Thresholds,
    corpus: CorpusConfig,
    logs: BTreeMap<String, String>,
    scrape: Vec<ScrapeTarget>,
    report: ReportConfig,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub paths: PathsConfig,
    pub thresholds: Thresholds,
    pub corpus: CorpusConfig,
    /// Movie title to log file name, resolved against `paths.log_dirs`.
    pub logs: BTreeMap<String, String>,
    pub scrape: Vec<ScrapeTarget>,
    pub report: ReportConfig,
}

impl PipelineConfig {
    pub fn parse(toml_src: &str) -> Result<Self, String> {
        let raw: RawPipelineConfig =
            toml::from_str(toml_src).map_err(|err| format!("invalid config: {err}"))?;
        raw.thresholds.validate()?;
        if raw.paths.log_dirs.is_empty() && !raw.logs.is_empty() {
            return Err("paths.log_dirs is empty but logs are configured".to_string());
        }
        for (title, file) in &raw.logs {
            if title.trim().is_empty() || file.trim().is_empty() {
                return Err(format!("log entry {title:?} = {file:?} is incomplete"));
            }
        }
        for target in &raw.scrape {
            if target.title.trim().is_empty() || target.url.trim().is_empty() {
                return Err("scrape entry needs both title and url".to_string());
            }
        }
        if raw.report.wasteland_min_seconds > raw.report.wasteland_max_seconds {
            return Err("report.wasteland_min_seconds exceeds wasteland_max_seconds".to_string());
        }
        Ok(PipelineConfig {
            paths: raw.paths,
            thresholds: raw.thresholds,
            corpus: raw.corpus,
            logs: raw.logs,
            scrape: raw.scrape,
            report: raw.report,
        })
    }

    /// Reads the config file, or falls back to defaults when none is given.
    pub fn load(path: Option<&Path>) -> Result<Self, IngestError> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(IngestError::MissingInput(path.to_path_buf()));
                }
                let src = fs::read_to_string(path)?;
                Self::parse(&src).map_err(IngestError::Config)
            }
            None => Ok(Self::default()),
        }
    }
}
