use shotlen_ingest::IngestError;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("chart error: {0}")]
    Chart(String),
    #[error("input error: {0}")]
    Input(#[from] IngestError),
}
