pub mod config;
pub mod corpus;
pub mod error;
pub mod log_parser;
pub mod model;
pub mod pipeline;
pub mod scrape;
pub mod stream;
pub mod table;
pub mod timecode;
pub mod title;

pub use crate::config::{PipelineConfig, ReportConfig, Thresholds};
pub use crate::corpus::{CorpusNormalizer, NormalizeOutcome};
pub use crate::error::{IngestError, RecordRejection, Rejections};
pub use crate::log_parser::{parse_log, LogParse, LogParser};
pub use crate::model::{CorpusShotRecord, ShotRecord, ShotRow};
pub use crate::pipeline::{
    fetch_corpus_stage, normalize_corpus_stage, parse_logs_stage, scrape_stage, CorpusStageReport,
    LogStageReport, ScrapeStageReport, StreamSource,
};
pub use crate::title::normalize_title;
