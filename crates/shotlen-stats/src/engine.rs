use crate::ceiling::{self, CeilingReport, CeilingRules};
use crate::curve::{self, CurvePoint};
use crate::genre::{self, GenreSubset};
use crate::pace::{self, CutsPerMinute, MoviePace};
use crate::summary::{median, GlobalStatistics, MovieStatistics};
use serde::Serialize;
use shotlen_ingest::{normalize_title, ShotRow, Thresholds};
use std::collections::BTreeMap;
use tracing::info;

/// Corpus titles highlighted next to the hand-scraped set in the blockbuster
/// comparison. Matched exactly against cleaned titles.
pub const NOTABLE_CORPUS_TITLES: &[&str] = &[
    "Harry Potter and the order of phoenix",
    "Harry Potter and the Half-Blood Prince",
    "Indiana Jones and the last crusade",
    "Gran Torino",
    "Identity Thief",
    "Vantage Point",
    "Quantum of Solace",
    "Spider-Man2",
    "TITANIC",
    "Iron Man",
    "Avatar",
    "Skyfall",
];

/// Franchise fragments that always qualify a corpus movie as notable.
const NOTABLE_FRANCHISES: &[&str] = &["Harry Potter", "Spider-Man"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    HandScraped,
    Corpus,
}

impl Dataset {
    pub fn as_str(self) -> &'static str {
        match self {
            Dataset::HandScraped => "hand_scraped",
            Dataset::Corpus => "corpus",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsConfig {
    pub runtime_floor_minutes: f64,
    pub ceiling_seconds: f64,
    pub ceiling_rules: CeilingRules,
    pub curve_max_seconds: f64,
    pub curve_points: usize,
    pub barcode_window_seconds: f64,
}

impl From<&Thresholds> for StatsConfig {
    fn from(thresholds: &Thresholds) -> Self {
        Self {
            runtime_floor_minutes: thresholds.runtime_floor_minutes,
            ceiling_seconds: thresholds.ceiling_seconds,
            ceiling_rules: CeilingRules {
                strict_min_shots: thresholds.strict_ceiling_min_shots,
                soft_min_shots: thresholds.soft_ceiling_min_shots,
                soft_ratio: thresholds.soft_ceiling_ratio,
            },
            curve_max_seconds: thresholds.curve_max_seconds,
            curve_points: thresholds.curve_points,
            barcode_window_seconds: thresholds.barcode_window_seconds,
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self::from(&Thresholds::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieSummary {
    pub title: String,
    pub stats: MovieStatistics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThresholdFraction {
    pub threshold: f64,
    pub global: f64,
    pub per_movie: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieMedian {
    pub title: String,
    pub dataset: Dataset,
    pub median: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub title: String,
    pub shot_index: usize,
    pub start_minute: f64,
    pub duration: f64,
}

#[derive(Debug, Clone)]
struct MovieShots {
    rows: Vec<ShotRow>,
    durations: Vec<f64>,
}

/// Shots of one dataset grouped by title. Rows keep their source order inside
/// each movie; `all` keeps global source order.
#[derive(Debug, Clone, Default)]
struct ShotTable {
    movies: BTreeMap<String, MovieShots>,
    all: Vec<f64>,
}

impl ShotTable {
    fn from_rows(rows: Vec<ShotRow>) -> Self {
        let mut table = ShotTable::default();
        for row in rows {
            table.all.push(row.duration_seconds);
            let movie = table
                .movies
                .entry(row.movie_title.clone())
                .or_insert_with(|| MovieShots {
                    rows: Vec::new(),
                    durations: Vec::new(),
                });
            movie.durations.push(row.duration_seconds);
            movie.rows.push(row);
        }
        table
    }

    fn movies(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.movies
            .iter()
            .map(|(title, movie)| (title.as_str(), movie.durations.as_slice()))
    }

    fn matching<'a>(&'a self, fragment: &str) -> Vec<(&'a str, &'a [f64])> {
        let fragment = fragment.to_lowercase();
        self.movies()
            .filter(|(title, _)| title.to_lowercase().contains(&fragment))
            .collect()
    }
}

/// Read-only view over the hand-scraped and bulk-corpus shot tables. Corpus
/// identifiers are turned into display titles once, here.
#[derive(Debug, Clone)]
pub struct ShotStatistics {
    config: StatsConfig,
    hand_scraped: ShotTable,
    corpus: ShotTable,
}

impl ShotStatistics {
    pub fn new(hand_scraped: Vec<ShotRow>, corpus: Vec<ShotRow>, config: StatsConfig) -> Self {
        let corpus = corpus
            .into_iter()
            .map(|row| ShotRow {
                movie_title: normalize_title(&row.movie_title),
                ..row
            })
            .collect();
        let stats = Self {
            config,
            hand_scraped: ShotTable::from_rows(hand_scraped),
            corpus: ShotTable::from_rows(corpus),
        };
        info!(
            hand_scraped_shots = stats.hand_scraped.all.len(),
            hand_scraped_movies = stats.hand_scraped.movies.len(),
            corpus_shots = stats.corpus.all.len(),
            corpus_movies = stats.corpus.movies.len(),
            "statistics engine ready"
        );
        stats
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    fn table(&self, dataset: Dataset) -> &ShotTable {
        match dataset {
            Dataset::HandScraped => &self.hand_scraped,
            Dataset::Corpus => &self.corpus,
        }
    }

    pub fn is_empty(&self, dataset: Dataset) -> bool {
        self.table(dataset).all.is_empty()
    }

    /// Every duration of the dataset in source order.
    pub fn durations(&self, dataset: Dataset) -> &[f64] {
        &self.table(dataset).all
    }

    pub fn movie_count(&self, dataset: Dataset) -> usize {
        self.table(dataset).movies.len()
    }

    pub fn global_stats(&self, dataset: Dataset) -> GlobalStatistics {
        GlobalStatistics::from_durations(self.durations(dataset))
    }

    /// Sorted by title.
    pub fn per_movie(&self, dataset: Dataset) -> Vec<MovieSummary> {
        self.table(dataset)
            .movies()
            .map(|(title, durations)| MovieSummary {
                title: title.to_string(),
                stats: MovieStatistics::from_durations(durations),
            })
            .collect()
    }

    pub fn cuts_per_minute(&self, dataset: Dataset) -> CutsPerMinute {
        pace::cuts_per_minute(
            self.table(dataset).movies(),
            self.config.runtime_floor_minutes,
        )
    }

    pub fn under_threshold(&self, dataset: Dataset, threshold: f64) -> ThresholdFraction {
        let table = self.table(dataset);
        ThresholdFraction {
            threshold,
            global: ceiling::fraction_under(&table.all, threshold),
            per_movie: table
                .movies()
                .map(|(title, durations)| {
                    (
                        title.to_string(),
                        ceiling::fraction_under(durations, threshold),
                    )
                })
                .collect(),
        }
    }

    /// Fraction of corpus shots with `lo <= duration <= hi`.
    pub fn wasteland_fraction(&self, lo: f64, hi: f64) -> f64 {
        let all = &self.corpus.all;
        if all.is_empty() {
            return 0.0;
        }
        let inside = all.iter().filter(|d| (lo..=hi).contains(*d)).count();
        inside as f64 / all.len() as f64
    }

    pub fn ceiling_report(&self, threshold: f64) -> CeilingReport {
        ceiling::ceiling_report(self.corpus.movies(), threshold, self.config.ceiling_rules)
    }

    pub fn cost_curve(&self) -> Vec<CurvePoint> {
        curve::cost_curve(
            &self.corpus.all,
            self.config.curve_max_seconds,
            self.config.curve_points,
        )
    }

    /// Percentage of corpus shots lasting at most `seconds`.
    pub fn coverage_at(&self, seconds: f64) -> Option<CurvePoint> {
        curve::coverage_at(&self.corpus.all, seconds)
    }

    pub fn genre_subsets(&self) -> Vec<GenreSubset> {
        genre::genre_subsets(self.corpus.movies())
    }

    /// Pooled pace of every movie in `dataset` whose title contains
    /// `fragment`, ignoring case. `None` when nothing matches.
    pub fn movie_pace(&self, dataset: Dataset, fragment: &str) -> Option<MoviePace> {
        let matched = self.table(dataset).matching(fragment);
        let pooled: Vec<f64> = matched
            .iter()
            .flat_map(|(_, durations)| durations.iter().copied())
            .collect();
        let cuts_per_minute = pace::pace(&pooled)?;
        let title = match matched.as_slice() {
            [(title, _)] => title.to_string(),
            _ => fragment.to_string(),
        };
        Some(MoviePace {
            title,
            shot_count: pooled.len(),
            minutes: pooled.iter().sum::<f64>() / 60.0,
            cuts_per_minute,
        })
    }

    /// Searches the hand-scraped set first, then the corpus.
    pub fn find_pace(&self, fragment: &str) -> Option<MoviePace> {
        self.movie_pace(Dataset::HandScraped, fragment)
            .or_else(|| self.movie_pace(Dataset::Corpus, fragment))
    }

    /// Median shot of every hand-scraped movie plus the notable corpus
    /// movies, hand-scraped titles winning on collision. Sorted by median.
    pub fn blockbuster_medians(&self, notable: &[&str]) -> Vec<MovieMedian> {
        let mut medians: Vec<MovieMedian> = self
            .hand_scraped
            .movies()
            .map(|(title, durations)| MovieMedian {
                title: title.to_string(),
                dataset: Dataset::HandScraped,
                median: median(durations),
            })
            .collect();
        for (title, durations) in self.corpus.movies() {
            let is_notable = notable.iter().any(|name| *name == title)
                || NOTABLE_FRANCHISES
                    .iter()
                    .any(|franchise| title.contains(franchise));
            if !is_notable || medians.iter().any(|known| known.title == title) {
                continue;
            }
            medians.push(MovieMedian {
                title: title.to_string(),
                dataset: Dataset::Corpus,
                median: median(durations),
            });
        }
        medians.sort_by(|a, b| {
            a.median
                .total_cmp(&b.median)
                .then_with(|| a.title.cmp(&b.title))
        });
        medians
    }

    /// Cut times of one hand-scraped movie, in seconds from its first frame,
    /// up to and including `window`. Shots are ordered by shot number.
    pub fn cut_points(&self, title: &str, window: f64) -> Vec<f64> {
        let Some(movie) = self.hand_scraped.movies.get(title) else {
            return Vec::new();
        };
        let mut rows: Vec<&ShotRow> = movie.rows.iter().collect();
        rows.sort_by_key(|row| row.shot_number.unwrap_or(u32::MAX));
        let mut elapsed = 0.0;
        let mut cuts = Vec::new();
        for row in rows {
            elapsed += row.duration_seconds;
            if elapsed > window {
                break;
            }
            cuts.push(elapsed);
        }
        cuts
    }

    /// Position of every corpus shot within its movie.
    pub fn pace_timeline(&self) -> Vec<TimelinePoint> {
        let mut timeline = Vec::with_capacity(self.corpus.all.len());
        for (title, durations) in self.corpus.movies() {
            let mut start = 0.0;
            for (shot_index, duration) in durations.iter().enumerate() {
                timeline.push(TimelinePoint {
                    title: title.to_string(),
                    shot_index,
                    start_minute: start / 60.0,
                    duration: *duration,
                });
                start += duration;
            }
        }
        timeline
    }

    pub fn hand_scraped_titles(&self) -> impl Iterator<Item = &str> {
        self.hand_scraped.movies.keys().map(String::as_str)
    }
}
