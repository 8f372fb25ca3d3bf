use crate::charts::{render_charts, ChartEntry};
use crate::error::ReportError;
use crate::manifest::{input_file, write_manifest, InputFile, ReportManifest};
use crate::markdown::render_markdown;
use serde::Serialize;
use shotlen_ingest::table::read_rows;
use shotlen_ingest::{IngestError, PipelineConfig, ReportConfig, ShotRow};
use shotlen_stats::{
    CeilingReport, CurvePoint, CutsPerMinute, Dataset, Genre, GlobalStatistics, MovieMedian,
    MoviePace, MovieStatistics, MovieSummary, ShotStatistics, StatsConfig, ThresholdFraction,
    NOTABLE_CORPUS_TITLES,
};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const REPORT_JSON: &str = "analysis-report.json";
pub const REPORT_MARKDOWN: &str = "report.md";
/// Durations the report quotes exact cost-of-consistency coverage for.
pub const COVERAGE_MARKS: [f64; 4] = [5.0, 10.0, 20.0, 60.0];

#[derive(Debug, Clone, Serialize)]
pub struct InputTable {
    pub dataset: String,
    pub path: PathBuf,
    pub available: bool,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub movies: usize,
    pub global: GlobalStatistics,
    pub per_movie: Vec<MovieSummary>,
    pub cuts_per_minute: CutsPerMinute,
    pub under_ceiling: ThresholdFraction,
}

impl DatasetSummary {
    fn compute(stats: &ShotStatistics, dataset: Dataset) -> Option<Self> {
        if stats.is_empty(dataset) {
            return None;
        }
        Some(Self {
            movies: stats.movie_count(dataset),
            global: stats.global_stats(dataset),
            per_movie: stats.per_movie(dataset),
            cuts_per_minute: stats.cuts_per_minute(dataset),
            under_ceiling: stats.under_threshold(dataset, stats.config().ceiling_seconds),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Wasteland {
    pub min_seconds: f64,
    pub max_seconds: f64,
    pub fraction: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaceComparison {
    pub query: String,
    pub pace: Option<MoviePace>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreSummary {
    pub genre: Genre,
    pub movies: usize,
    pub stats: MovieStatistics,
}

/// Every number the markdown report and charts are built from. Corpus-only
/// sections are `None` when the corpus table is missing or empty.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: String,
    pub inputs: Vec<InputTable>,
    pub hand_scraped: Option<DatasetSummary>,
    pub corpus: Option<DatasetSummary>,
    pub wasteland: Option<Wasteland>,
    pub ceiling: Option<CeilingReport>,
    pub editorial_pace: Vec<PaceComparison>,
    pub industry_cuts_per_minute: Option<f64>,
    pub blockbusters: Vec<MovieMedian>,
    pub cost_curve: Vec<CurvePoint>,
    pub coverage: Vec<CurvePoint>,
    pub genres: Vec<GenreSummary>,
    pub charts: Vec<ChartEntry>,
}

pub fn build_report(
    stats: &ShotStatistics,
    report_config: &ReportConfig,
    inputs: Vec<InputTable>,
) -> AnalysisReport {
    let corpus = DatasetSummary::compute(stats, Dataset::Corpus);
    let corpus_present = corpus.is_some();
    let industry_cuts_per_minute = corpus
        .as_ref()
        .filter(|summary| !summary.cuts_per_minute.movies.is_empty())
        .map(|summary| summary.cuts_per_minute.median_rate);

    AnalysisReport {
        generated_at: chrono_stamp(),
        inputs,
        hand_scraped: DatasetSummary::compute(stats, Dataset::HandScraped),
        wasteland: corpus_present.then(|| Wasteland {
            min_seconds: report_config.wasteland_min_seconds,
            max_seconds: report_config.wasteland_max_seconds,
            fraction: stats.wasteland_fraction(
                report_config.wasteland_min_seconds,
                report_config.wasteland_max_seconds,
            ),
        }),
        ceiling: corpus_present.then(|| stats.ceiling_report(stats.config().ceiling_seconds)),
        corpus,
        editorial_pace: report_config
            .pace_movies
            .iter()
            .map(|query| PaceComparison {
                query: query.clone(),
                pace: stats.find_pace(query),
            })
            .collect(),
        industry_cuts_per_minute,
        blockbusters: stats.blockbuster_medians(NOTABLE_CORPUS_TITLES),
        cost_curve: stats.cost_curve(),
        coverage: COVERAGE_MARKS
            .iter()
            .filter_map(|mark| stats.coverage_at(*mark))
            .collect(),
        genres: stats
            .genre_subsets()
            .into_iter()
            .map(|subset| GenreSummary {
                genre: subset.genre,
                movies: subset.titles.len(),
                stats: MovieStatistics::from_durations(&subset.durations),
            })
            .collect(),
        charts: Vec::new(),
    }
}

#[derive(Debug)]
pub struct AnalysisOutcome {
    pub out_dir: PathBuf,
    pub files_written: Vec<PathBuf>,
    pub missing_inputs: Vec<PathBuf>,
    pub report: AnalysisReport,
    pub manifest: ReportManifest,
}

struct LoadedTable {
    table: InputTable,
    rows: Vec<ShotRow>,
    hashed: Option<InputFile>,
}

fn load_table(dataset: &str, path: &Path) -> Result<LoadedTable, ReportError> {
    match read_rows(path) {
        Ok(rows) => {
            info!(dataset, path = %path.display(), rows = rows.len(), "loaded shot table");
            Ok(LoadedTable {
                table: InputTable {
                    dataset: dataset.to_string(),
                    path: path.to_path_buf(),
                    available: true,
                    rows: rows.len(),
                },
                hashed: Some(input_file(dataset, path)?),
                rows,
            })
        }
        Err(IngestError::MissingInput(missing)) => {
            warn!(dataset, path = %missing.display(), "shot table not available");
            Ok(LoadedTable {
                table: InputTable {
                    dataset: dataset.to_string(),
                    path: missing,
                    available: false,
                    rows: 0,
                },
                rows: Vec::new(),
                hashed: None,
            })
        }
        Err(err) => Err(err.into()),
    }
}

/// Reads the normalized tables, computes every statistic and writes the JSON
/// report, markdown summary, charts and manifest. Missing tables are reported,
/// not fatal.
pub fn run_analysis(config: &PipelineConfig) -> Result<AnalysisOutcome, ReportError> {
    let paths = &config.paths;
    let loaded = [
        ("hand_scraped", paths.hero_table()),
        ("scraped", paths.scraped_table()),
        ("corpus", paths.corpus_table()),
    ]
    .iter()
    .map(|(dataset, path)| load_table(dataset, path))
    .collect::<Result<Vec<_>, _>>()?;

    let mut inputs = Vec::new();
    let mut hashed = Vec::new();
    let mut missing_inputs = Vec::new();
    let mut logged = Vec::new();
    let mut scraped = Vec::new();
    let mut corpus = Vec::new();
    for table in loaded {
        if !table.table.available {
            missing_inputs.push(table.table.path.clone());
        }
        match table.table.dataset.as_str() {
            "corpus" => corpus = table.rows,
            "scraped" => scraped = table.rows,
            _ => logged = table.rows,
        }
        hashed.extend(table.hashed);
        inputs.push(table.table);
    }
    let hand_scraped = merge_scraped(logged, scraped);

    let stats = ShotStatistics::new(
        hand_scraped,
        corpus,
        StatsConfig::from(&config.thresholds),
    );
    let mut report = build_report(&stats, &config.report, inputs);
    report.charts = render_charts(&stats, &config.thresholds, &config.report, &paths.plots_dir)?;

    let out_dir = paths.output_dir.clone();
    fs::create_dir_all(&out_dir)?;
    let json_path = out_dir.join(REPORT_JSON);
    fs::write(&json_path, serde_json::to_string_pretty(&report)?)?;
    let markdown_path = out_dir.join(REPORT_MARKDOWN);
    fs::write(&markdown_path, render_markdown(&report))?;

    let mut files_written = vec![json_path, markdown_path];
    files_written.extend(report.charts.iter().filter_map(|chart| chart.path.clone()));
    let (manifest_path, manifest) =
        write_manifest(&out_dir, &report.generated_at, hashed, &files_written)?;
    files_written.push(manifest_path);
    info!(
        out_dir = %out_dir.display(),
        files = files_written.len(),
        missing = missing_inputs.len(),
        "analysis written"
    );

    Ok(AnalysisOutcome {
        out_dir,
        files_written,
        missing_inputs,
        report,
        manifest,
    })
}

/// Appends scraped rows to the log-parsed rows. A movie that was logged keeps
/// only its logged shots.
pub(crate) fn merge_scraped(logged: Vec<ShotRow>, scraped: Vec<ShotRow>) -> Vec<ShotRow> {
    let logged_titles: BTreeSet<String> =
        logged.iter().map(|row| row.movie_title.clone()).collect();
    let mut dropped = BTreeMap::<String, usize>::new();
    let mut merged = logged;
    for row in scraped {
        if logged_titles.contains(&row.movie_title) {
            *dropped.entry(row.movie_title).or_default() += 1;
        } else {
            merged.push(row);
        }
    }
    for (movie, rows) in &dropped {
        info!(movie = %movie, rows, "scraped shots ignored, movie already logged");
    }
    merged
}

fn chrono_stamp() -> String {
    let now = std::time::SystemTime::now();
    let secs = now
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{secs}")
}
