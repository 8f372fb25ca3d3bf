use crate::summary::sorted;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub duration: f64,
    pub percent_covered: f64,
}

/// Discretized empirical CDF: for each swept duration, the percentage of shots
/// lasting at most that long.
///
/// The sweep has `points` evenly spaced values from 0 to `max_seconds`
/// inclusive. When the longest shot lies beyond the sweep, a terminal point at
/// that duration is appended so the curve always ends at 100%.
pub fn cost_curve(durations: &[f64], max_seconds: f64, points: usize) -> Vec<CurvePoint> {
    let sorted = sorted(durations);
    if sorted.is_empty() || points == 0 {
        return Vec::new();
    }
    let total = sorted.len() as f64;
    let covered = |duration: f64| {
        let count = sorted.partition_point(|d| *d <= duration);
        count as f64 / total * 100.0
    };

    let step = if points > 1 {
        max_seconds / (points - 1) as f64
    } else {
        0.0
    };
    let mut curve: Vec<CurvePoint> = (0..points)
        .map(|index| {
            let duration = if index + 1 == points {
                max_seconds
            } else {
                step * index as f64
            };
            CurvePoint {
                duration,
                percent_covered: covered(duration),
            }
        })
        .collect();

    let longest = sorted[sorted.len() - 1];
    if longest > max_seconds {
        curve.push(CurvePoint {
            duration: longest,
            percent_covered: 100.0,
        });
    }
    curve
}

/// Exact coverage at one duration. `None` for an empty set of shots.
pub fn coverage_at(durations: &[f64], seconds: f64) -> Option<CurvePoint> {
    if durations.is_empty() {
        return None;
    }
    let covered = durations.iter().filter(|d| **d <= seconds).count();
    Some(CurvePoint {
        duration: seconds,
        percent_covered: covered as f64 / durations.len() as f64 * 100.0,
    })
}
