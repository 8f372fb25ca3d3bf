use shotlen_ingest::table::read_rows;
use shotlen_ingest::{
    fetch_corpus_stage, normalize_corpus_stage, parse_logs_stage, IngestError, PipelineConfig,
    StreamSource,
};
use std::fs;
use std::path::Path;

const LOG: &str = r#"
- generic [ref=e1]:
  - generic [ref=e2]: "1"
  - generic [ref=e3]: 00:00.0
  - generic [ref=e4]: "2.5"
  - generic [ref=e5]: "2"
  - generic [ref=e6]: 00:02.5
  - generic [ref=e7]: "4.0"
"#;

fn config_for(root: &Path, extra: &str) -> PipelineConfig {
    let src = format!(
        "[paths]\ndata_dir = {data:?}\nlog_dirs = [{missing:?}, {logs:?}]\n\n{extra}",
        data = root.join("data").display().to_string(),
        missing = root.join("browser-logs").display().to_string(),
        logs = root.join("logs").display().to_string(),
    );
    PipelineConfig::parse(&src).expect("config parses")
}

#[test]
fn log_stage_skips_missing_files_and_writes_table() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(temp.path().join("logs")).expect("create logs dir");
    fs::write(temp.path().join("logs/heat.log"), LOG).expect("write log");
    let config = config_for(
        temp.path(),
        "[logs]\n\"Heat\" = \"heat.log\"\n\"Ronin\" = \"ronin.log\"\n",
    );

    let report = parse_logs_stage(&config).expect("log stage runs");
    assert_eq!(report.shots_written, 2);
    assert_eq!(report.missing, vec!["ronin.log".to_string()]);
    assert_eq!(report.parsed.len(), 1);
    assert_eq!(report.parsed[0].path, temp.path().join("logs/heat.log"));

    let rows = read_rows(&report.table_path).expect("read table");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].shot_number, Some(2));
    assert_eq!(rows[1].start_timestamp.as_deref(), Some("00:02.5"));
    assert_eq!(rows[1].duration_seconds, 4.0);
}

#[test]
fn log_stage_with_no_logs_writes_empty_table() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = config_for(temp.path(), "[logs]\n\"Ronin\" = \"ronin.log\"\n");
    let report = parse_logs_stage(&config).expect("log stage runs");
    assert_eq!(report.shots_written, 0);
    assert!(read_rows(&report.table_path).expect("read table").is_empty());
}

#[test]
fn corpus_stage_reports_missing_document() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = config_for(temp.path(), "");
    let err = normalize_corpus_stage(&config, Some(temp.path().join("absent.json").as_path()))
        .unwrap_err();
    assert!(matches!(err, IngestError::MissingInput(_)));
    assert!(!config.paths.corpus_table().exists());
}

#[test]
fn corpus_stage_normalizes_document() {
    let temp = tempfile::tempdir().expect("tempdir");
    let document = temp.path().join("movies_scenes.json");
    fs::write(
        &document,
        r#"{"1_Heat": {"scene one": ["s_00.00.00.000-00.00.02.000", "s_00.00.02.000-00.00.01.000"]}}"#,
    )
    .expect("write document");
    let config = config_for(temp.path(), "");
    let report = normalize_corpus_stage(&config, Some(document.as_path())).expect("corpus stage runs");
    assert_eq!(report.shots_written, 1);
    assert_eq!(report.dropped, 1);
    let rows = read_rows(&report.table_path).expect("read table");
    assert_eq!(rows[0].movie_title, "1_Heat");
    assert_eq!(rows[0].duration_seconds, 2.0);
}

#[test]
fn fetch_stage_honours_cap_from_file_stream() {
    let temp = tempfile::tempdir().expect("tempdir");
    let stream = temp.path().join("corpus.jsonl");
    let mut lines = String::new();
    for movie in 0..10 {
        lines.push_str(&format!(
            "{{\"movie_name\": \"movie_{movie}\", \"shots\": [{{\"duration\": 1.0}}, {{\"duration\": 2.0}}]}}\n"
        ));
    }
    fs::write(&stream, lines).expect("write stream");
    let config = config_for(temp.path(), "");

    let report =
        fetch_corpus_stage(&config, &StreamSource::File(stream), Some(5)).expect("fetch runs");
    assert!(report.capped);
    assert_eq!(report.shots_written, 5);
    assert_eq!(report.movies, 3);
}

#[test]
fn fetch_stage_failure_writes_nothing() {
    let temp = tempfile::tempdir().expect("tempdir");
    let stream = temp.path().join("corpus.jsonl");
    fs::write(&stream, "{\"movie_name\": \"a\", \"shots\": [{\"duration\": 1.0}]}\n<html>\n")
        .expect("write stream");
    let config = config_for(temp.path(), "");
    let err = fetch_corpus_stage(&config, &StreamSource::File(stream), None).unwrap_err();
    assert!(matches!(err, IngestError::UpstreamFetch(_)));
    assert!(!config.paths.corpus_table().exists());
}
