//! Domain-driven configuration management for the testbed tools
//!
//! Configuration is split by functional domain (InfluxDB connection, metrics
//! export, logging, load generation). Each domain has defaults, validation and
//! `LOCUST_*` environment variable overrides.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    export::ExportConfig, influxdb::InfluxDbConfig, loadgen::LoadgenConfig,
    logging::LoggingConfig, TestbedConfig,
};

// Re-export utilities
pub use domains::utils::serde_duration;
