//! Structured logging infrastructure for the testbed tools
//!
//! Everything logs through `tracing`; this crate only decides how the global
//! subscriber is built from the `logging` configuration domain.

pub mod init;

pub use init::{build_env_filter, init_logging_from_config, init_simple_tracing};
pub use testbed_config::domains::logging::{LogFormat, LogLevel, LoggingConfig};
