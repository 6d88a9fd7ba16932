//! Query client configuration

use std::time::Duration;
use testbed_config::domains::influxdb::InfluxDbConfig;

/// Resolved connection settings for [`crate::InfluxClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct InfluxConfig {
    /// Base URL of the HTTP API, without a trailing slash
    pub base_url: String,

    /// Database every query runs against
    pub database: String,

    /// Basic-auth credentials, if any
    pub username: Option<String>,
    pub password: Option<String>,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Whether to verify SSL certificates
    pub verify_ssl: bool,
}

impl Default for InfluxConfig {
    fn default() -> Self {
        InfluxDbConfig::default().into()
    }
}

impl From<InfluxDbConfig> for InfluxConfig {
    fn from(config: InfluxDbConfig) -> Self {
        Self {
            base_url: config.base_url(),
            database: config.database,
            username: config.username,
            password: config.password,
            timeout: config.timeout,
            user_agent: format!("testbed/{}", env!("CARGO_PKG_VERSION")),
            verify_ssl: config.verify_ssl,
        }
    }
}
