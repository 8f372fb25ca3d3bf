use crate::summary::MovieStatistics;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CeilingMovie {
    pub title: String,
    pub max: f64,
    pub median: f64,
    pub count: usize,
    /// Fraction of this movie's shots strictly under the threshold, in 0..=1.
    pub fraction_under: f64,
}

/// Movies that never (strict) or almost never (soft) hold a shot past the
/// threshold.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CeilingReport {
    pub threshold: f64,
    pub strict: Vec<CeilingMovie>,
    pub soft: Vec<CeilingMovie>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CeilingRules {
    pub strict_min_shots: usize,
    pub soft_min_shots: usize,
    pub soft_ratio: f64,
}

pub fn fraction_under(durations: &[f64], threshold: f64) -> f64 {
    if durations.is_empty() {
        return 0.0;
    }
    let under = durations.iter().filter(|d| **d < threshold).count();
    under as f64 / durations.len() as f64
}

pub fn ceiling_report<'a, I>(movies: I, threshold: f64, rules: CeilingRules) -> CeilingReport
where
    I: IntoIterator<Item = (&'a str, &'a [f64])>,
{
    let mut report = CeilingReport {
        threshold,
        ..CeilingReport::default()
    };
    for (title, durations) in movies {
        let stats = MovieStatistics::from_durations(durations);
        if stats.is_empty() {
            continue;
        }
        let movie = CeilingMovie {
            title: title.to_string(),
            max: stats.max,
            median: stats.median,
            count: stats.count,
            fraction_under: fraction_under(durations, threshold),
        };
        if movie.max < threshold && movie.count > rules.strict_min_shots {
            report.strict.push(movie.clone());
        }
        if movie.fraction_under >= rules.soft_ratio && movie.count > rules.soft_min_shots {
            report.soft.push(movie);
        }
    }
    report
        .strict
        .sort_by(|a, b| a.max.total_cmp(&b.max).then_with(|| a.title.cmp(&b.title)));
    report.soft.sort_by(|a, b| {
        b.fraction_under
            .total_cmp(&a.fraction_under)
            .then_with(|| a.title.cmp(&b.title))
    });
    report
}
