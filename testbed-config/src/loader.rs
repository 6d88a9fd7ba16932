//! Configuration loading and environment variable handling

use crate::domains::TestbedConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with the default `LOCUST` prefix
    pub fn new() -> Self {
        Self {
            prefix: "LOCUST".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<TestbedConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: TestbedConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<TestbedConfig> {
        let mut config = TestbedConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<TestbedConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut TestbedConfig) -> ConfigResult<()> {
        self.apply_influxdb_overrides(&mut config.influxdb)?;
        self.apply_export_overrides(&mut config.export)?;
        self.apply_logging_overrides(&mut config.logging)?;
        self.apply_loadgen_overrides(&mut config.loadgen)?;
        Ok(())
    }

    /// Apply InfluxDB connection overrides
    fn apply_influxdb_overrides(
        &self,
        config: &mut crate::domains::influxdb::InfluxDbConfig,
    ) -> ConfigResult<()> {
        if let Ok(server) = self.get_env_var("INFLUXDB_SERVER") {
            config.server = server;
        }

        if let Ok(port) = self.get_env_var("INFLUXDB_PORT") {
            config.port = port
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid INFLUXDB_PORT: {}", e)))?;
        }

        if let Ok(user) = self.get_env_var("INFLUXDB_USER") {
            config.username = Some(user);
        }

        if let Ok(password) = self.get_env_var("INFLUXDB_PASSWORD") {
            config.password = Some(password);
        }

        if let Ok(database) = self.get_env_var("INFLUXDB_DB") {
            config.database = database;
        }

        if let Ok(timeout) = self.get_env_var("INFLUXDB_TIMEOUT") {
            let seconds: u64 = timeout.parse().map_err(|e| {
                ConfigError::EnvError(format!("Invalid INFLUXDB_TIMEOUT: {}", e))
            })?;
            config.timeout = std::time::Duration::from_secs(seconds);
        }

        Ok(())
    }

    /// Apply export overrides
    fn apply_export_overrides(
        &self,
        config: &mut crate::domains::export::ExportConfig,
    ) -> ConfigResult<()> {
        if let Ok(root) = self.get_env_var("METRICS_EXPORT") {
            config.output_root = PathBuf::from(root);
        }

        if let Ok(name) = self.get_env_var("MEASUREMENT_NAME") {
            config.measurement_name = name;
        }

        Ok(())
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    /// Apply load generator overrides
    fn apply_loadgen_overrides(
        &self,
        config: &mut crate::domains::loadgen::LoadgenConfig,
    ) -> ConfigResult<()> {
        if let Ok(host) = self.get_env_var("LOADGEN_HOST") {
            config.host = host;
        }

        if let Ok(users) = self.get_env_var("LOADGEN_USERS") {
            config.users = users
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid LOADGEN_USERS: {}", e)))?;
        }

        if let Ok(run_time) = self.get_env_var("LOADGEN_RUN_TIME") {
            let seconds: u64 = run_time.parse().map_err(|e| {
                ConfigError::EnvError(format!("Invalid LOADGEN_RUN_TIME: {}", e))
            })?;
            config.run_time = std::time::Duration::from_secs(seconds);
        }

        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
