//! Query client error types

/// Error type for InfluxDB query operations
#[derive(Debug, thiserror::Error)]
pub enum InfluxError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Query failed: {message}")]
    QueryFailed { message: String },

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
