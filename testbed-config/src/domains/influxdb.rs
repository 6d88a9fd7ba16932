//! InfluxDB connection configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for the metrics database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluxDbConfig {
    /// Server host name
    #[serde(default = "default_server")]
    pub server: String,

    /// HTTP API port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Optional user name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Optional password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Database to query
    #[serde(default = "default_database")]
    pub database: String,

    /// Use https instead of http
    #[serde(default)]
    pub ssl: bool,

    /// Whether to verify SSL certificates
    #[serde(default = "crate::domains::utils::default_true")]
    pub verify_ssl: bool,

    /// Per-query request timeout
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_timeout"
    )]
    pub timeout: Duration,
}

impl InfluxDbConfig {
    /// Base URL of the HTTP API, e.g. `http://localhost:8086`
    pub fn base_url(&self) -> String {
        let scheme = if self.ssl { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.server, self.port)
    }
}

impl Default for InfluxDbConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            port: default_port(),
            username: None,
            password: None,
            database: default_database(),
            ssl: false,
            verify_ssl: true,
            timeout: default_timeout(),
        }
    }
}

impl Validatable for InfluxDbConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.server, "server", self.domain_name())?;
        validate_required_string(&self.database, "database", self.domain_name())?;
        validate_positive(self.port, "port", self.domain_name())?;
        validate_positive(self.timeout.as_secs(), "timeout", self.domain_name())?;

        if self.password.is_some() && self.username.is_none() {
            return Err(self.validation_error("password is set but username is not"));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "influxdb"
    }
}

fn default_server() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8086
}

fn default_database() -> String {
    "metrics".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = InfluxDbConfig::default();
        assert_eq!(config.server, "localhost");
        assert_eq!(config.port, 8086);
        assert_eq!(config.database, "metrics");
        assert!(config.username.is_none());
        assert!(config.password.is_none());
        assert_eq!(config.base_url(), "http://localhost:8086");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ssl_switches_scheme() {
        let config = InfluxDbConfig {
            ssl: true,
            server: "influx.internal".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://influx.internal:8086");
    }

    #[test]
    fn test_password_without_username_is_rejected() {
        let config = InfluxDbConfig {
            password: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
