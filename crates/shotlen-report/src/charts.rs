use crate::error::ReportError;
use plotters::prelude::*;
use serde::Serialize;
use shotlen_ingest::{ReportConfig, Thresholds};
use shotlen_stats::curve::{cost_curve, CurvePoint};
use shotlen_stats::{Dataset, GenreSubset, ShotStatistics};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const WIDE: (u32, u32) = (1280, 420);
const SQUARE: (u32, u32) = (1280, 760);
const FONT: &str = "sans-serif";
const DENSITY_POINTS: usize = 240;
const GENRE_BINS: usize = 40;
const GENRE_RANGE_SECONDS: f64 = 30.0;
const BLOCKBUSTER_REFERENCE_SECONDS: f64 = 5.0;

const PALETTE: [RGBColor; 3] = [
    RGBColor(200, 0, 100),
    RGBColor(30, 144, 255),
    RGBColor(34, 139, 34),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    CutBarcode,
    CumulativeDensity,
    BlockbusterMedians,
    CostOfConsistency,
    GenreDistribution,
    MaxShot,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::CutBarcode,
        ChartKind::CumulativeDensity,
        ChartKind::BlockbusterMedians,
        ChartKind::CostOfConsistency,
        ChartKind::GenreDistribution,
        ChartKind::MaxShot,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::CutBarcode => "cut_barcode.svg",
            ChartKind::CumulativeDensity => "cumulative_density.svg",
            ChartKind::BlockbusterMedians => "blockbuster_medians.svg",
            ChartKind::CostOfConsistency => "cost_of_consistency.svg",
            ChartKind::GenreDistribution => "genre_distribution.svg",
            ChartKind::MaxShot => "max_shot.svg",
        }
    }
}

/// Outcome of one chart: either the file it was drawn to or why it was not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartEntry {
    pub kind: ChartKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

impl ChartEntry {
    fn drawn(kind: ChartKind, path: PathBuf) -> Self {
        Self {
            kind,
            path: Some(path),
            skipped: None,
        }
    }

    fn skipped(kind: ChartKind, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!(chart = kind.file_name(), %reason, "skipping chart");
        Self {
            kind,
            path: None,
            skipped: Some(reason),
        }
    }
}

/// Draws every chart whose input is present into `plots_dir`. Charts with no
/// data are skipped, never drawn from placeholder values.
pub fn render_charts(
    stats: &ShotStatistics,
    thresholds: &Thresholds,
    report: &ReportConfig,
    plots_dir: &Path,
) -> Result<Vec<ChartEntry>, ReportError> {
    fs::create_dir_all(plots_dir)?;
    let mut entries = Vec::new();
    for kind in ChartKind::ALL {
        let path = plots_dir.join(kind.file_name());
        let drawn = match kind {
            ChartKind::CutBarcode => {
                let window = thresholds.barcode_window_seconds;
                let cuts = stats.cut_points(&report.barcode_movie, window);
                if cuts.is_empty() {
                    Err(format!("no hand-scraped shots for {}", report.barcode_movie))
                } else {
                    Ok(draw_barcode(&path, &report.barcode_movie, &cuts, window))
                }
            }
            ChartKind::CumulativeDensity => {
                let series: Vec<(&str, Vec<CurvePoint>)> = [
                    ("hand-scraped", Dataset::HandScraped),
                    ("bulk corpus", Dataset::Corpus),
                ]
                .into_iter()
                .filter(|(_, dataset)| !stats.is_empty(*dataset))
                .map(|(label, dataset)| {
                    let curve = cost_curve(
                        stats.durations(dataset),
                        thresholds.curve_max_seconds,
                        DENSITY_POINTS,
                    );
                    (label, curve)
                })
                .collect();
                if series.is_empty() {
                    Err("no shots in either dataset".to_string())
                } else {
                    Ok(draw_cumulative(&path, &series, thresholds.curve_max_seconds))
                }
            }
            ChartKind::BlockbusterMedians => {
                let bars: Vec<(String, f64)> = stats
                    .blockbuster_medians(shotlen_stats::NOTABLE_CORPUS_TITLES)
                    .into_iter()
                    .map(|movie| (movie.title, movie.median))
                    .collect();
                if bars.is_empty() {
                    Err("no hand-scraped or notable corpus movies".to_string())
                } else {
                    Ok(draw_movie_bars(
                        &path,
                        "Median shot length",
                        &bars,
                        BLOCKBUSTER_REFERENCE_SECONDS,
                    ))
                }
            }
            ChartKind::CostOfConsistency => {
                let curve = stats.cost_curve();
                if curve.is_empty() {
                    Err("bulk corpus is empty".to_string())
                } else {
                    Ok(draw_cost_curve(&path, &curve, thresholds.ceiling_seconds))
                }
            }
            ChartKind::GenreDistribution => {
                let subsets: Vec<GenreSubset> = stats
                    .genre_subsets()
                    .into_iter()
                    .filter(|subset| !subset.is_empty())
                    .collect();
                if subsets.is_empty() {
                    Err("no corpus movie matches a genre keyword".to_string())
                } else {
                    Ok(draw_genre_distribution(&path, &subsets))
                }
            }
            ChartKind::MaxShot => {
                let bars: Vec<(String, f64)> = stats
                    .per_movie(Dataset::HandScraped)
                    .into_iter()
                    .map(|movie| (movie.title, movie.stats.max))
                    .collect();
                if bars.is_empty() {
                    Err("hand-scraped set is empty".to_string())
                } else {
                    Ok(draw_movie_bars(
                        &path,
                        "Longest shot per movie",
                        &bars,
                        thresholds.ceiling_seconds,
                    ))
                }
            }
        };
        match drawn {
            Ok(result) => {
                result.map_err(|err| ReportError::Chart(format!("{}: {err}", kind.file_name())))?;
                info!(chart = %path.display(), "chart written");
                entries.push(ChartEntry::drawn(kind, path));
            }
            Err(reason) => entries.push(ChartEntry::skipped(kind, reason)),
        }
    }
    Ok(entries)
}

fn chart_err<E: std::fmt::Display>(err: E) -> String {
    format!("plotting error: {err}")
}

fn draw_barcode(path: &Path, title: &str, cuts: &[f64], window: f64) -> Result<(), String> {
    let root = SVGBackend::new(path, WIDE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{title}: every cut in the first {:.0} s", window),
            (FONT, 24),
        )
        .margin(20)
        .x_label_area_size(40)
        .build_cartesian_2d(0.0..window, 0.0..1.0)
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .y_labels(0)
        .x_desc("seconds")
        .draw()
        .map_err(chart_err)?;
    chart
        .draw_series(
            cuts.iter()
                .map(|cut| PathElement::new(vec![(*cut, 0.0), (*cut, 1.0)], BLACK.stroke_width(1))),
        )
        .map_err(chart_err)?;
    root.present().map_err(chart_err)?;
    Ok(())
}

fn draw_cumulative(
    path: &Path,
    series: &[(&str, Vec<CurvePoint>)],
    max_seconds: f64,
) -> Result<(), String> {
    let root = SVGBackend::new(path, SQUARE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Cumulative shot length distribution", (FONT, 24))
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0.0..max_seconds, 0.0..100.0)
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .x_desc("shot length (s)")
        .y_desc("% of shots at or under")
        .draw()
        .map_err(chart_err)?;
    for (index, (label, curve)) in series.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        chart
            .draw_series(LineSeries::new(
                curve
                    .iter()
                    .filter(|point| point.duration <= max_seconds)
                    .map(|point| (point.duration, point.percent_covered)),
                color.stroke_width(2),
            ))
            .map_err(chart_err)?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], color));
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.7))
        .border_style(BLACK.mix(0.3))
        .position(SeriesLabelPosition::LowerRight)
        .draw()
        .map_err(chart_err)?;
    root.present().map_err(chart_err)?;
    Ok(())
}

fn draw_cost_curve(path: &Path, curve: &[CurvePoint], ceiling: f64) -> Result<(), String> {
    let x_max = curve
        .iter()
        .map(|point| point.duration)
        .fold(1.0, f64::max);
    let root = SVGBackend::new(path, SQUARE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Cost of consistency", (FONT, 24))
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0.0..x_max, 0.0..100.0)
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .x_desc("consistent generation length (s)")
        .y_desc("% of real shots covered")
        .draw()
        .map_err(chart_err)?;
    chart
        .draw_series(LineSeries::new(
            curve
                .iter()
                .map(|point| (point.duration, point.percent_covered)),
            PALETTE[0].stroke_width(2),
        ))
        .map_err(chart_err)?;
    if ceiling <= x_max {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(ceiling, 0.0), (ceiling, 100.0)],
                BLACK.mix(0.5).stroke_width(1),
            )))
            .map_err(chart_err)?;
        chart
            .draw_series(std::iter::once(Text::new(
                format!("{ceiling:.0} s"),
                (ceiling, 5.0),
                (FONT, 16),
            )))
            .map_err(chart_err)?;
    }
    root.present().map_err(chart_err)?;
    Ok(())
}

/// Horizontal bars, one per movie, with a vertical reference line.
fn draw_movie_bars(
    path: &Path,
    caption: &str,
    bars: &[(String, f64)],
    reference: f64,
) -> Result<(), String> {
    let count = bars.len();
    let x_max = bars
        .iter()
        .map(|(_, value)| *value)
        .fold(reference, f64::max)
        * 1.1;
    let height = (120 + 28 * count as u32).max(SQUARE.1 / 2);
    let root = SVGBackend::new(path, (SQUARE.0, height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (FONT, 24))
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 320)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0.0..x_max, (0..count).into_segmented())
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(count)
        .y_label_formatter(&|value| match value {
            SegmentValue::CenterOf(index) => bars
                .get(*index)
                .map(|(title, _)| title.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc("seconds")
        .draw()
        .map_err(chart_err)?;
    chart
        .draw_series(bars.iter().enumerate().map(|(index, (_, value))| {
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(index)),
                    (*value, SegmentValue::Exact(index + 1)),
                ],
                PALETTE[1].filled(),
            );
            bar.set_margin(4, 4, 0, 0);
            bar
        }))
        .map_err(chart_err)?;
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![
                (reference, SegmentValue::Exact(0)),
                (reference, SegmentValue::Exact(count)),
            ],
            PALETTE[0].stroke_width(2),
        )))
        .map_err(chart_err)?
        .label(format!("{reference:.0} s"))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], PALETTE[0]));
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.7))
        .border_style(BLACK.mix(0.3))
        .draw()
        .map_err(chart_err)?;
    root.present().map_err(chart_err)?;
    Ok(())
}

/// Share of a genre's shots per bin over `0..GENRE_RANGE_SECONDS`, as a
/// density so genres of different sizes stay comparable.
fn genre_density(durations: &[f64]) -> Vec<(f64, f64)> {
    let width = GENRE_RANGE_SECONDS / GENRE_BINS as f64;
    let mut counts = vec![0_usize; GENRE_BINS];
    for duration in durations {
        if *duration < 0.0 || *duration >= GENRE_RANGE_SECONDS {
            continue;
        }
        let bin = ((duration / width) as usize).min(GENRE_BINS - 1);
        counts[bin] += 1;
    }
    let total = durations.len() as f64;
    counts
        .into_iter()
        .enumerate()
        .map(|(bin, count)| ((bin as f64 + 0.5) * width, count as f64 / total / width))
        .collect()
}

fn draw_genre_distribution(path: &Path, subsets: &[GenreSubset]) -> Result<(), String> {
    let densities: Vec<(String, Vec<(f64, f64)>)> = subsets
        .iter()
        .map(|subset| (subset.genre.to_string(), genre_density(&subset.durations)))
        .collect();
    let y_max = densities
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(_, density)| *density))
        .fold(0.01, f64::max)
        * 1.1;
    let root = SVGBackend::new(path, SQUARE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Shot length by genre", (FONT, 24))
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0.0..GENRE_RANGE_SECONDS, 0.0..y_max)
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .x_desc("shot length (s)")
        .y_desc("density")
        .draw()
        .map_err(chart_err)?;
    for (index, (genre, points)) in densities.into_iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(chart_err)?
            .label(genre)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], color));
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.7))
        .border_style(BLACK.mix(0.3))
        .draw()
        .map_err(chart_err)?;
    root.present().map_err(chart_err)?;
    Ok(())
}
