//! InfluxDB HTTP client implementation

use crate::config::InfluxConfig;
use crate::errors::InfluxError;
use crate::types::QueryResponse;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Anything that can answer an InfluxQL query
#[async_trait::async_trait]
pub trait QueryClient: Send + Sync {
    async fn query(&self, query: &str) -> Result<QueryResponse, InfluxError>;
}

/// Connection handle for one InfluxDB database
#[derive(Debug, Clone)]
pub struct InfluxClient {
    client: Client,
    config: InfluxConfig,
}

impl InfluxClient {
    /// Create a client with the given configuration
    pub fn new(config: InfluxConfig) -> Result<Self, InfluxError> {
        if config.base_url.is_empty() {
            return Err(InfluxError::ConfigError("base_url cannot be empty".to_string()));
        }

        debug!(
            "Creating InfluxClient for {} (database: {}, timeout: {}s)",
            config.base_url,
            config.database,
            config.timeout.as_secs()
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &InfluxConfig {
        &self.config
    }

    /// Check that the server is reachable
    pub async fn ping(&self) -> Result<(), InfluxError> {
        let url = format!("{}/ping", self.config.base_url.trim_end_matches('/'));
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InfluxError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let version = response
            .headers()
            .get("X-Influxdb-Version")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");
        info!("Connected to InfluxDB {} at {}", version, self.config.base_url);
        Ok(())
    }
}

#[async_trait::async_trait]
impl QueryClient for InfluxClient {
    async fn query(&self, query: &str) -> Result<QueryResponse, InfluxError> {
        let start_time = Instant::now();
        let url = format!("{}/query", self.config.base_url.trim_end_matches('/'));

        debug!("Running query: {}", query.trim());

        let mut request = self
            .client
            .get(&url)
            .query(&[("db", self.config.database.as_str()), ("q", query)]);

        if let Some(username) = &self.config.username {
            request = request.basic_auth(username, self.config.password.as_ref());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Query rejected with HTTP {}: {}", status.as_u16(), body);
            return Err(InfluxError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: QueryResponse = serde_json::from_slice(&bytes)?;

        if let Some(message) = parsed.first_error() {
            return Err(InfluxError::QueryFailed {
                message: message.to_string(),
            });
        }

        debug!(
            "Query returned {} series in {}ms",
            parsed.series().count(),
            start_time.elapsed().as_millis()
        );

        Ok(parsed)
    }
}
