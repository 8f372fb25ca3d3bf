pub mod analysis;
pub mod charts;
pub mod error;
pub mod manifest;
pub mod markdown;

pub use crate::analysis::{
    build_report, run_analysis, AnalysisOutcome, AnalysisReport, DatasetSummary, InputTable,
};
pub use crate::charts::{render_charts, ChartEntry, ChartKind};
pub use crate::error::ReportError;
pub use crate::manifest::{write_manifest, GeneratedFile, ReportManifest};
pub use crate::markdown::render_markdown;
