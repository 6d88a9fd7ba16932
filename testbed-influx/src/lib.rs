//! InfluxDB query client for the testbed metrics export
//!
//! This crate wraps the InfluxDB 1.x HTTP `/query` endpoint behind the
//! [`QueryClient`] trait so the export pipeline can be driven by a real
//! server or, with the `testing` feature, by a mockall mock.

pub mod client;
pub mod config;
pub mod errors;
pub mod types;

#[cfg(feature = "testing")]
pub mod testing;

// Re-export main types for convenience
pub use client::{InfluxClient, QueryClient};
pub use config::InfluxConfig;
pub use errors::InfluxError;
pub use types::{QueryResponse, Row, Series, StatementResult};
