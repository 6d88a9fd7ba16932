//! Error types for the export pipeline

use testbed_influx::InfluxError;
use thiserror::Error;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Query failed ({query}): {source}")]
    Query {
        query: String,
        #[source]
        source: InfluxError,
    },

    #[error("Invalid timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Row has no string 'time' column")]
    MissingTime,

    #[error("Invalid time range: {start} is after {end}")]
    InvalidRange { start: String, end: String },

    #[error("Invalid scroll window: {0}")]
    InvalidWindow(String),

    #[error("Filesystem error during {operation} on {path}: {source}")]
    Io {
        path: String,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TSV encoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Export of service '{service}' failed: {source}")]
    Service {
        service: String,
        #[source]
        source: Box<ExportError>,
    },
}

impl ExportError {
    pub(crate) fn io(path: &std::path::Path, operation: &str, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.to_string_lossy().to_string(),
            operation: operation.to_string(),
            source,
        }
    }
}
