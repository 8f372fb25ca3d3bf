pub mod ceiling;
pub mod curve;
pub mod engine;
pub mod genre;
pub mod pace;
pub mod summary;

pub use crate::ceiling::{CeilingMovie, CeilingReport, CeilingRules};
pub use crate::curve::CurvePoint;
pub use crate::engine::{
    Dataset, MovieMedian, MovieSummary, ShotStatistics, StatsConfig, ThresholdFraction,
    TimelinePoint, NOTABLE_CORPUS_TITLES,
};
pub use crate::genre::{Genre, GenreSubset};
pub use crate::pace::{CutsPerMinute, MoviePace};
pub use crate::summary::{GlobalStatistics, MovieStatistics};
