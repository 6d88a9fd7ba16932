//! Domain-specific configuration modules

pub mod export;
pub mod influxdb;
pub mod loadgen;
pub mod logging;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main testbed configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TestbedConfig {
    /// Metrics database connection
    #[serde(default)]
    pub influxdb: influxdb::InfluxDbConfig,

    /// Metrics export run settings
    #[serde(default)]
    pub export: export::ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Load generator configuration
    #[serde(default)]
    pub loadgen: loadgen::LoadgenConfig,
}

impl TestbedConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.influxdb.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        self.loadgen.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = TestbedConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
