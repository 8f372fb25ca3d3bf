use shotlen_ingest::{ShotRow, Thresholds};
use shotlen_stats::{
    Dataset, Genre, GlobalStatistics, ShotStatistics, StatsConfig, NOTABLE_CORPUS_TITLES,
};

fn corpus_movie(id: &str, durations: &[f64]) -> Vec<ShotRow> {
    durations.iter().map(|d| ShotRow::new(id, *d)).collect()
}

#[test]
fn empty_tables_yield_zeroed_results() {
    let stats = ShotStatistics::new(Vec::new(), Vec::new(), StatsConfig::default());

    for dataset in [Dataset::HandScraped, Dataset::Corpus] {
        assert!(stats.is_empty(dataset));
        assert_eq!(stats.global_stats(dataset), GlobalStatistics::default());
        assert!(stats.per_movie(dataset).is_empty());
        let cpm = stats.cuts_per_minute(dataset);
        assert!(cpm.movies.is_empty());
        assert_eq!(cpm.median_rate, 0.0);
        let under = stats.under_threshold(dataset, 20.0);
        assert_eq!(under.global, 0.0);
        assert!(under.per_movie.is_empty());
        assert!(stats.movie_pace(dataset, "anything").is_none());
    }
    assert_eq!(stats.wasteland_fraction(10.0, 30.0), 0.0);
    assert!(stats.cost_curve().is_empty());
    assert!(stats.ceiling_report(20.0).strict.is_empty());
    assert!(stats.genre_subsets().iter().all(|subset| subset.is_empty()));
    assert!(stats.blockbuster_medians(NOTABLE_CORPUS_TITLES).is_empty());
    assert!(stats.pace_timeline().is_empty());
}

#[test]
fn two_minute_sample_does_not_count_towards_cuts_per_minute() {
    let mut corpus = corpus_movie("1_Clip", &[40.0, 40.0, 40.0]);
    corpus.extend(corpus_movie("2_Feature", &[6.0; 100]));
    let stats = ShotStatistics::new(Vec::new(), corpus, StatsConfig::default());

    let cpm = stats.cuts_per_minute(Dataset::Corpus);
    assert_eq!(cpm.movies.len(), 1);
    assert_eq!(cpm.movies[0].title, "Feature");
    assert_eq!(cpm.movies[0].cuts_per_minute, 10.0);
    assert_eq!(cpm.median_rate, 10.0);
}

#[test]
fn cost_curve_reaches_full_coverage_by_longest_shot() {
    let corpus = corpus_movie("7_Long_Takes", &[1.5, 3.0, 8.0, 45.0, 75.0]);
    let stats = ShotStatistics::new(Vec::new(), corpus, StatsConfig::default());

    let curve = stats.cost_curve();
    assert!(curve
        .windows(2)
        .all(|pair| pair[0].duration < pair[1].duration
            && pair[0].percent_covered <= pair[1].percent_covered));
    let full = curve
        .iter()
        .find(|point| point.percent_covered >= 100.0)
        .expect("curve reaches 100%");
    assert!(full.duration <= 75.0);
    assert_eq!(curve[59].percent_covered, 60.0);
}

#[test]
fn genre_subsets_are_multi_label() {
    let mut corpus = corpus_movie("1_Avatar_Argo_Crossover", &[2.0, 3.0]);
    corpus.extend(corpus_movie("2_Superbad", &[4.0]));
    let stats = ShotStatistics::new(Vec::new(), corpus, StatsConfig::default());

    let subsets = stats.genre_subsets();
    let action = &subsets[Genre::Action as usize];
    let drama = &subsets[Genre::Drama as usize];
    let comedy = &subsets[Genre::Comedy as usize];
    assert_eq!(action.titles, vec!["Avatar Argo Crossover"]);
    assert_eq!(drama.durations, action.durations);
    assert_eq!(comedy.durations, vec![4.0]);
}

#[test]
fn ceiling_report_uses_configured_rules() {
    let thresholds = Thresholds {
        strict_ceiling_min_shots: 3,
        soft_ceiling_min_shots: 4,
        soft_ceiling_ratio: 0.8,
        ..Thresholds::default()
    };
    let mut corpus = corpus_movie("1_Quantum_of_Solace", &[1.0, 2.0, 3.0, 19.9]);
    corpus.extend(corpus_movie("2_Gran_Torino", &[2.0, 4.0, 6.0, 8.0, 24.0]));
    let stats = ShotStatistics::new(Vec::new(), corpus, StatsConfig::from(&thresholds));

    let report = stats.ceiling_report(thresholds.ceiling_seconds);
    assert_eq!(report.threshold, 20.0);
    assert_eq!(report.strict.len(), 1);
    assert_eq!(report.strict[0].title, "Quantum of Solace");
    assert_eq!(report.strict[0].max, 19.9);
    assert_eq!(report.soft.len(), 1);
    assert_eq!(report.soft[0].title, "Gran Torino");
    assert_eq!(report.soft[0].fraction_under, 0.8);
}

#[test]
fn movie_pace_searches_hand_scraped_before_corpus() {
    let hero = vec![
        ShotRow::new("Mad Max: Fury Road", 3.0),
        ShotRow::new("Mad Max: Fury Road", 3.0),
    ];
    let corpus = corpus_movie("9_The_Godfather", &[10.0, 20.0, 30.0]);
    let stats = ShotStatistics::new(hero, corpus, StatsConfig::default());

    let mad_max = stats.find_pace("mad max").expect("hand-scraped match");
    assert_eq!(mad_max.title, "Mad Max: Fury Road");
    assert_eq!(mad_max.cuts_per_minute, 20.0);

    let godfather = stats.find_pace("GODFATHER").expect("corpus match");
    assert_eq!(godfather.shot_count, 3);
    assert_eq!(godfather.cuts_per_minute, 3.0);

    assert!(stats.find_pace("Casablanca").is_none());
}
