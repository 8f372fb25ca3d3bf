use shotlen_ingest::table::write_rows;
use shotlen_ingest::{PipelineConfig, ShotRow};
use shotlen_report::{run_analysis, ChartKind};
use std::fs;
use std::path::Path;

fn config_for(root: &Path) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.paths.data_dir = root.join("data");
    config.paths.plots_dir = root.join("plots");
    config.paths.output_dir = root.join("output");
    config.report.barcode_movie = "Heat".to_string();
    config
}

fn hero_rows() -> Vec<ShotRow> {
    (1..=40)
        .map(|number| ShotRow {
            shot_number: Some(number),
            ..ShotRow::new("Heat", 2.0 + f64::from(number % 5))
        })
        .collect()
}

fn corpus_rows() -> Vec<ShotRow> {
    let mut rows: Vec<ShotRow> = (0..120)
        .map(|index| ShotRow::new("12_Skyfall", 1.0 + f64::from(index % 7)))
        .collect();
    rows.extend((0..60).map(|index| ShotRow::new("40_Gran_Torino", 4.0 + f64::from(index % 20))));
    rows.push(ShotRow::new("40_Gran_Torino", 75.0));
    rows
}

#[test]
fn analysis_writes_report_charts_and_manifest() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = config_for(temp.path());
    write_rows(&config.paths.hero_table(), &hero_rows()).expect("write hero table");
    write_rows(&config.paths.corpus_table(), &corpus_rows()).expect("write corpus table");

    let outcome = run_analysis(&config).expect("analysis runs");
    assert_eq!(outcome.missing_inputs, vec![config.paths.scraped_table()]);
    for kind in ChartKind::ALL {
        assert!(
            config.paths.plots_dir.join(kind.file_name()).exists(),
            "{} not drawn",
            kind.file_name()
        );
    }
    assert_eq!(outcome.files_written.len(), 2 + ChartKind::ALL.len() + 1);

    let report = &outcome.report;
    let hero = report.hand_scraped.as_ref().expect("hand-scraped summary");
    assert_eq!(hero.movies, 1);
    assert_eq!(hero.global.count, 40);
    let corpus = report.corpus.as_ref().expect("corpus summary");
    assert_eq!(corpus.per_movie[0].title, "Gran Torino");
    assert_eq!(report.cost_curve.last().map(|p| p.percent_covered), Some(100.0));
    assert_eq!(report.cost_curve.last().map(|p| p.duration), Some(75.0));
    assert!(report.editorial_pace.iter().all(|entry| entry.pace.is_none()));

    let markdown = fs::read_to_string(outcome.out_dir.join("report.md")).expect("markdown");
    assert!(markdown.contains("| Heat | 40 |"));
    assert!(markdown.contains("scraped: `"));
    assert!(markdown.contains("_not available_"));

    let json = fs::read_to_string(outcome.out_dir.join("analysis-report.json")).expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("report json");
    assert!(value["generated_at"].is_string());
    assert_eq!(value["hand_scraped"]["global"]["count"], 40);

    assert_eq!(outcome.manifest.inputs.len(), 2);
    assert_eq!(
        outcome.manifest.generated_files.len(),
        2 + ChartKind::ALL.len()
    );
    assert!(outcome
        .manifest
        .generated_files
        .iter()
        .any(|file| file.path == "../plots/cut_barcode.svg"));
    assert!(outcome.out_dir.join("manifest.json").exists());
}

#[test]
fn analysis_without_tables_reports_missing_inputs() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = config_for(temp.path());

    let outcome = run_analysis(&config).expect("analysis runs");
    assert_eq!(outcome.missing_inputs.len(), 3);
    assert!(outcome.report.hand_scraped.is_none());
    assert!(outcome.report.corpus.is_none());
    assert!(outcome.report.ceiling.is_none());
    assert!(outcome.report.cost_curve.is_empty());
    assert!(outcome.report.charts.iter().all(|chart| chart.path.is_none()));
    assert_eq!(outcome.files_written.len(), 3);
    assert!(!config.paths.plots_dir.join("max_shot.svg").exists());

    let markdown = fs::read_to_string(outcome.out_dir.join("report.md")).expect("markdown");
    assert!(markdown.contains("## Bulk corpus\n\n_not available_"));
    assert!(markdown.contains("Industry median: _not available_"));
}

#[test]
fn analysis_keeps_logged_shots_over_scraped_page() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = config_for(temp.path());
    write_rows(&config.paths.hero_table(), &hero_rows()).expect("write hero table");
    let scraped = vec![
        ShotRow::new("Heat", 30.0),
        ShotRow::new("Heat", 31.0),
        ShotRow::new("Collateral", 3.0),
    ];
    write_rows(&config.paths.scraped_table(), &scraped).expect("write scraped table");

    let outcome = run_analysis(&config).expect("analysis runs");
    let hero = outcome.report.hand_scraped.as_ref().expect("hand-scraped summary");
    assert_eq!(hero.movies, 2);
    assert_eq!(hero.global.count, 41);
    let heat = hero
        .per_movie
        .iter()
        .find(|movie| movie.title == "Heat")
        .expect("heat summary");
    assert_eq!(heat.stats.count, 40);
    assert!(heat.stats.max < 30.0);
}
