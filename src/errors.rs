use thiserror::Error;

/// Raised when a raw table cannot become a canonical ledger.
///
/// Validation failures halt the current view but are never fatal to the
/// process; per-row parse failures are dropped and counted instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("no valid rows after cleaning")]
    NoValidRows,
}

/// Failure of an external collaborator. Always recovered locally with a
/// fallback (canned tips, z-score detection), never propagated as a crash.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("narrative model failed: {0}")]
    Narrative(String),
    #[error("anomaly detector failed: {0}")]
    Detector(String),
}

/// Error type that captures common ingestion failures.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Error type that captures configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
