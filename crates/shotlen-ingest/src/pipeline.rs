use crate::config::PipelineConfig;
use crate::corpus::{parse_document, CorpusNormalizer, NormalizeOutcome};
use crate::error::IngestError;
use crate::log_parser::LogParser;
use crate::model::ShotRow;
use crate::scrape::{http_client, scrape_movie};
use crate::stream::{json_lines, normalize_stream};
use crate::table::{read_rows, write_rows};
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug)]
pub struct LogStageReport {
    pub table_path: PathBuf,
    pub shots_written: usize,
    pub parsed: Vec<ParsedLog>,
    pub missing: Vec<String>,
}

#[derive(Debug)]
pub struct ParsedLog {
    pub movie_title: String,
    pub path: PathBuf,
    pub shots: usize,
}

#[derive(Debug)]
pub struct CorpusStageReport {
    pub table_path: PathBuf,
    pub shots_written: usize,
    pub movies: usize,
    pub dropped: usize,
    pub movies_skipped: usize,
    pub capped: bool,
}

#[derive(Debug)]
pub struct ScrapeStageReport {
    pub table_path: PathBuf,
    pub shots_written: usize,
    pub failed: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum StreamSource {
    Url(String),
    File(PathBuf),
}

/// First existing `dir/file` in search order.
pub fn resolve_log_path(dirs: &[PathBuf], file: &str) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(file))
        .find(|candidate| candidate.is_file())
}

/// Parses every configured log into the hand-scraped table. Missing logs are
/// reported and skipped; the table is written even when it ends up empty.
pub fn parse_logs_stage(config: &PipelineConfig) -> Result<LogStageReport, IngestError> {
    let parser = LogParser::new(config.thresholds.shot_number_ceiling);
    let mut rows = Vec::new();
    let mut parsed = Vec::new();
    let mut missing = Vec::new();

    for (title, file) in &config.logs {
        let Some(path) = resolve_log_path(&config.paths.log_dirs, file) else {
            warn!(movie = %title, file = %file, "log file not found, skipping");
            missing.push(file.clone());
            continue;
        };
        info!(movie = %title, path = %path.display(), "parsing log");
        let content = fs::read_to_string(&path)?;
        let parse = parser.parse(title, &content);
        info!(movie = %title, shots = parse.shots.len(), "parsed log");
        parsed.push(ParsedLog {
            movie_title: title.clone(),
            path,
            shots: parse.shots.len(),
        });
        rows.extend(parse.shots.into_iter().map(ShotRow::from));
    }

    let table_path = config.paths.hero_table();
    write_rows(&table_path, &rows)?;
    info!(shots = rows.len(), path = %table_path.display(), "wrote hand-scraped table");
    Ok(LogStageReport {
        table_path,
        shots_written: rows.len(),
        parsed,
        missing,
    })
}

/// Normalizes the bulk corpus from a JSON document or a row-oriented table.
pub fn normalize_corpus_stage(
    config: &PipelineConfig,
    input: Option<&Path>,
) -> Result<CorpusStageReport, IngestError> {
    let input = input.unwrap_or(config.corpus.document.as_path());
    if !input.exists() {
        return Err(IngestError::MissingInput(input.to_path_buf()));
    }
    let normalizer = CorpusNormalizer::new(config.thresholds.frame_rate);
    let outcome = if is_tabular(input) {
        normalizer.normalize_rows(read_rows(input)?)
    } else {
        let src = fs::read_to_string(input)?;
        normalizer.normalize_document(&parse_document(&src)?)
    };
    finish_corpus(config, outcome, 0, false)
}

/// Streams the corpus from a remote endpoint or a local JSON-lines file.
/// Nothing is written unless the stream completes or hits the cap.
pub fn fetch_corpus_stage(
    config: &PipelineConfig,
    source: &StreamSource,
    cap: Option<usize>,
) -> Result<CorpusStageReport, IngestError> {
    let cap = cap.unwrap_or(config.thresholds.stream_cap);
    let normalizer = CorpusNormalizer::new(config.thresholds.frame_rate);
    let outcome = match source {
        StreamSource::Url(url) => {
            info!(url = %url, cap, "fetching corpus stream");
            let response = http_client()?
                .get(url)
                .send()
                .and_then(|response| response.error_for_status())
                .map_err(|err| IngestError::UpstreamFetch(format!("GET {url}: {err}")))?;
            normalize_stream(json_lines(BufReader::new(response)), &normalizer, cap)?
        }
        StreamSource::File(path) => {
            if !path.exists() {
                return Err(IngestError::MissingInput(path.clone()));
            }
            info!(path = %path.display(), cap, "reading corpus stream");
            let file = fs::File::open(path)?;
            normalize_stream(json_lines(BufReader::new(file)), &normalizer, cap)?
        }
    };
    finish_corpus(
        config,
        outcome.normalized,
        outcome.movies_skipped,
        outcome.capped,
    )
}

/// Scrapes configured movie pages into the scraped table. A failed page is
/// logged and skipped; nothing is written when every page failed.
pub fn scrape_stage(config: &PipelineConfig) -> Result<ScrapeStageReport, IngestError> {
    let client = http_client()?;
    let mut rows = Vec::new();
    let mut failed = Vec::new();
    for target in &config.scrape {
        match scrape_movie(&client, &target.title, &target.url) {
            Ok(scraped) => rows.extend(scraped),
            Err(err) => {
                warn!(movie = %target.title, %err, "scrape failed");
                failed.push(target.title.clone());
            }
        }
    }
    let table_path = config.paths.scraped_table();
    if rows.is_empty() && !failed.is_empty() {
        return Err(IngestError::UpstreamFetch(format!(
            "every scrape target failed: {}",
            failed.join(", ")
        )));
    }
    write_rows(&table_path, &rows)?;
    Ok(ScrapeStageReport {
        table_path,
        shots_written: rows.len(),
        failed,
    })
}

fn finish_corpus(
    config: &PipelineConfig,
    outcome: NormalizeOutcome,
    movies_skipped: usize,
    capped: bool,
) -> Result<CorpusStageReport, IngestError> {
    let rows = outcome.rows();
    let table_path = config.paths.corpus_table();
    write_rows(&table_path, &rows)?;
    info!(
        shots = rows.len(),
        movies = outcome.movies,
        dropped = outcome.rejections.total(),
        path = %table_path.display(),
        "wrote corpus table"
    );
    Ok(CorpusStageReport {
        table_path,
        shots_written: rows.len(),
        movies: outcome.movies,
        dropped: outcome.rejections.total(),
        movies_skipped,
        capped,
    })
}

fn is_tabular(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}
