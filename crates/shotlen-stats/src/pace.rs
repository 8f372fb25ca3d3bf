use crate::summary::median;
use serde::Serialize;

const SECONDS_PER_MINUTE: f64 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoviePace {
    pub title: String,
    pub shot_count: usize,
    pub minutes: f64,
    pub cuts_per_minute: f64,
}

/// Per-movie pacing plus the median rate across the movies that qualified.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CutsPerMinute {
    pub movies: Vec<MoviePace>,
    pub median_rate: f64,
}

/// Shots per minute of runtime, or `None` when the runtime is zero.
pub fn pace(durations: &[f64]) -> Option<f64> {
    let minutes = durations.iter().sum::<f64>() / SECONDS_PER_MINUTE;
    (minutes > 0.0).then(|| durations.len() as f64 / minutes)
}

/// Movies whose runtime does not exceed `floor_minutes` are left out.
pub fn cuts_per_minute<'a, I>(movies: I, floor_minutes: f64) -> CutsPerMinute
where
    I: IntoIterator<Item = (&'a str, &'a [f64])>,
{
    let movies: Vec<MoviePace> = movies
        .into_iter()
        .filter_map(|(title, durations)| {
            let minutes = durations.iter().sum::<f64>() / SECONDS_PER_MINUTE;
            if minutes <= floor_minutes || minutes <= 0.0 {
                return None;
            }
            Some(MoviePace {
                title: title.to_string(),
                shot_count: durations.len(),
                minutes,
                cuts_per_minute: durations.len() as f64 / minutes,
            })
        })
        .collect();
    let rates: Vec<f64> = movies.iter().map(|movie| movie.cuts_per_minute).collect();
    CutsPerMinute {
        median_rate: median(&rates),
        movies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_samples_are_excluded() {
        let trailer = [40.0, 40.0, 40.0];
        let feature = vec![3.0; 200];
        let result = cuts_per_minute(
            [("Trailer", &trailer[..]), ("Feature", feature.as_slice())],
            5.0,
        );
        assert_eq!(result.movies.len(), 1);
        assert_eq!(result.movies[0].title, "Feature");
        assert_eq!(result.movies[0].cuts_per_minute, 20.0);
        assert_eq!(result.median_rate, 20.0);
    }

    #[test]
    fn median_is_robust_to_outlier_movie() {
        let a = vec![6.0; 100];
        let b = vec![3.0; 200];
        let c = vec![0.5; 1200];
        let result = cuts_per_minute(
            [("A", a.as_slice()), ("B", b.as_slice()), ("C", c.as_slice())],
            5.0,
        );
        assert_eq!(result.movies.len(), 3);
        assert_eq!(result.median_rate, 20.0);
    }

    #[test]
    fn empty_input_has_zero_rate() {
        let result = cuts_per_minute(std::iter::empty(), 5.0);
        assert!(result.movies.is_empty());
        assert_eq!(result.median_rate, 0.0);
        assert_eq!(pace(&[]), None);
    }
}
