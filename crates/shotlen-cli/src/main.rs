use clap::{Parser, Subcommand};
use shotlen_ingest::{
    fetch_corpus_stage, normalize_corpus_stage, parse_logs_stage, scrape_stage, IngestError,
    PipelineConfig, StreamSource,
};
use shotlen_report::run_analysis;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Shot length analysis pipeline", version)]
struct Args {
    /// Pipeline config (TOML). Built-in path conventions apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract shot tables from hand-scraped browser logs.
    ParseLogs,
    /// Normalize the bulk corpus document (JSON or CSV).
    NormalizeCorpus(NormalizeArgs),
    /// Stream the bulk corpus as JSON lines from a URL or file.
    FetchCorpus(FetchArgs),
    /// Pull shot lengths from the configured movie pages.
    Scrape,
    /// Compute statistics, charts and the report from the tables on disk.
    Analyze,
    /// parse-logs, normalize-corpus and analyze in sequence.
    Run,
}

#[derive(Parser, Debug)]
struct NormalizeArgs {
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FetchArgs {
    #[arg(long, conflicts_with = "file")]
    url: Option<String>,
    #[arg(long)]
    file: Option<PathBuf>,
    /// Stop after this many shots (defaults to thresholds.stream_cap).
    #[arg(long)]
    cap: Option<usize>,
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "shotlen=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = match PipelineConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!("config error: {err}");
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Command::ParseLogs => parse_logs(&config),
        Command::NormalizeCorpus(normalize) => normalize_corpus(&config, normalize.input),
        Command::FetchCorpus(fetch) => fetch_corpus(&config, fetch),
        Command::Scrape => scrape(&config),
        Command::Analyze => analyze(&config),
        Command::Run => run(&config),
    };
    if let Err(err) = result {
        error!("{err}");
        std::process::exit(1);
    }
}

fn parse_logs(config: &PipelineConfig) -> Result<(), String> {
    let report = parse_logs_stage(config).map_err(|err| format!("log stage failed: {err}"))?;
    println!(
        "Wrote {} shots from {} logs to {}",
        report.shots_written,
        report.parsed.len(),
        report.table_path.display()
    );
    for log in &report.parsed {
        println!("  {}: {} shots ({})", log.movie_title, log.shots, log.path.display());
    }
    for missing in &report.missing {
        println!("  missing log: {missing}");
    }
    Ok(())
}

fn normalize_corpus(config: &PipelineConfig, input: Option<PathBuf>) -> Result<(), String> {
    let report = normalize_corpus_stage(config, input.as_deref())
        .map_err(|err| format!("corpus stage failed: {err}"))?;
    println!(
        "Wrote {} shots from {} movies to {} ({} records dropped)",
        report.shots_written,
        report.movies,
        report.table_path.display(),
        report.dropped
    );
    Ok(())
}

fn fetch_corpus(config: &PipelineConfig, args: FetchArgs) -> Result<(), String> {
    let source = match (args.url, args.file) {
        (Some(url), _) => StreamSource::Url(url),
        (None, Some(file)) => StreamSource::File(file),
        (None, None) => match &config.corpus.stream_url {
            Some(url) => StreamSource::Url(url.clone()),
            None => return Err("fetch-corpus needs --url, --file or corpus.stream_url".to_string()),
        },
    };
    let report = fetch_corpus_stage(config, &source, args.cap)
        .map_err(|err| format!("corpus fetch failed: {err}"))?;
    println!(
        "Wrote {} shots from {} movies to {} (skipped {}, capped: {})",
        report.shots_written,
        report.movies,
        report.table_path.display(),
        report.movies_skipped,
        report.capped
    );
    Ok(())
}

fn scrape(config: &PipelineConfig) -> Result<(), String> {
    let report = scrape_stage(config).map_err(|err| format!("scrape failed: {err}"))?;
    println!(
        "Wrote {} scraped shots to {}",
        report.shots_written,
        report.table_path.display()
    );
    for title in &report.failed {
        println!("  failed: {title}");
    }
    Ok(())
}

fn analyze(config: &PipelineConfig) -> Result<(), String> {
    let outcome = run_analysis(config).map_err(|err| format!("analysis failed: {err}"))?;
    println!(
        "Wrote {} files to {}",
        outcome.files_written.len(),
        outcome.out_dir.display()
    );
    for missing in &outcome.missing_inputs {
        println!("  not available: {}", missing.display());
    }
    Ok(())
}

/// Stage failures are logged and the run moves on; the analysis reports
/// whatever inputs are missing.
fn run(config: &PipelineConfig) -> Result<(), String> {
    if let Err(err) = parse_logs(config) {
        warn!("{err}");
    }
    match normalize_corpus_stage(config, None) {
        Ok(report) => info!(
            shots = report.shots_written,
            movies = report.movies,
            "corpus normalized"
        ),
        Err(IngestError::MissingInput(path)) => {
            warn!(path = %path.display(), "corpus document not available")
        }
        Err(err) => warn!("corpus stage failed: {err}"),
    }
    analyze(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn fetch_flags_are_exclusive() {
        let args = Args::try_parse_from(["shotlen", "fetch-corpus", "--file", "c.jsonl", "--cap", "5"])
            .expect("args parse");
        match args.command {
            Command::FetchCorpus(fetch) => {
                assert_eq!(fetch.file, Some(PathBuf::from("c.jsonl")));
                assert_eq!(fetch.cap, Some(5));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Args::try_parse_from([
            "shotlen",
            "fetch-corpus",
            "--file",
            "c.jsonl",
            "--url",
            "https://example.invalid"
        ])
        .is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let args = Args::try_parse_from(["shotlen", "analyze", "--config", "shotlen.toml"])
            .expect("args parse");
        assert_eq!(args.config, Some(PathBuf::from("shotlen.toml")));
    }
}
