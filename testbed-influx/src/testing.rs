//! Mock implementations for testing
//!
//! Provides a mockall mock of [`QueryClient`] and small helpers for building
//! canned responses.

use async_trait::async_trait;
use mockall::mock;
use serde_json::Value as JsonValue;

use crate::{InfluxError, QueryClient, QueryResponse, Series};

mock! {
    pub QueryClient {}

    #[async_trait]
    impl QueryClient for QueryClient {
        async fn query(&self, query: &str) -> Result<QueryResponse, InfluxError>;
    }
}

/// Response to `SHOW TAG KEYS` / `SHOW FIELD KEYS` with one series per measurement
pub fn keys_response(key_column: &str, measurements: &[(&str, &[&str])]) -> QueryResponse {
    let series = measurements
        .iter()
        .map(|(name, keys)| {
            Series::new(
                *name,
                &[key_column],
                keys.iter().map(|k| vec![JsonValue::from(*k)]).collect(),
            )
        })
        .collect();
    QueryResponse::from_series(series)
}

/// Response to a `SELECT` with a single series
pub fn rows_response(name: &str, columns: &[&str], values: Vec<Vec<JsonValue>>) -> QueryResponse {
    QueryResponse::from_series(vec![Series::new(name, columns, values)])
}
