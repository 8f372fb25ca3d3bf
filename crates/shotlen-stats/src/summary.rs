use serde::Serialize;

/// Per-movie view over a set of shot durations. All fields are zero for an
/// empty set; check `count` before reading percentiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MovieStatistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub p95: f64,
    pub p99: f64,
}

impl MovieStatistics {
    pub fn from_durations(durations: &[f64]) -> Self {
        let sorted = sorted(durations);
        if sorted.is_empty() {
            return Self::default();
        }
        Self {
            count: sorted.len(),
            mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
            median: percentile_sorted(&sorted, 0.5),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            p95: percentile_sorted(&sorted, 0.95),
            p99: percentile_sorted(&sorted, 0.99),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GlobalStatistics {
    pub count: usize,
    pub median: f64,
    pub p95: f64,
    pub p99: f64,
    pub std_dev: f64,
}

impl GlobalStatistics {
    pub fn from_durations(durations: &[f64]) -> Self {
        let sorted = sorted(durations);
        Self {
            count: sorted.len(),
            median: percentile_sorted(&sorted, 0.5),
            p95: percentile_sorted(&sorted, 0.95),
            p99: percentile_sorted(&sorted, 0.99),
            std_dev: sample_std_dev(&sorted),
        }
    }
}

/// Ascending copy with NaN values removed.
pub fn sorted(durations: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = durations.iter().copied().filter(|d| !d.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Linear interpolation between closest ranks; 0.0 for an empty slice.
pub fn percentile_sorted(sorted: &[f64], quantile: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = quantile.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

pub fn percentile(durations: &[f64], quantile: f64) -> f64 {
    percentile_sorted(&sorted(durations), quantile)
}

pub fn median(durations: &[f64]) -> f64 {
    percentile(durations, 0.5)
}

/// Sample standard deviation (n - 1); 0.0 below two values.
pub fn sample_std_dev(durations: &[f64]) -> f64 {
    if durations.len() < 2 {
        return 0.0;
    }
    let n = durations.len() as f64;
    let mean = durations.iter().sum::<f64>() / n;
    let variance = durations
        .iter()
        .map(|d| (d - mean) * (d - mean))
        .sum::<f64>()
        / (n - 1.0);
    variance.sqrt()
}
