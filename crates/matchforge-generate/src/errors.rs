use thiserror::Error;

use crate::records::RecordKind;

/// Errors emitted while generating fixtures.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("attribute pool '{pool}' is empty")]
    EmptyPool { pool: &'static str },
    #[error("field '{field}' is not defined for {kind} records")]
    UnknownField { kind: RecordKind, field: String },
    #[error("asset error: {0}")]
    Asset(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
