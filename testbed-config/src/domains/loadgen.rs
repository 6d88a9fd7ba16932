//! Load generator configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, validate_url, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings shared by every load-generation workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadgenConfig {
    /// Base URL of the system under test
    #[serde(default = "default_host")]
    pub host: String,

    /// Number of concurrent simulated users
    #[serde(default = "default_users")]
    pub users: usize,

    /// Users launched per second
    #[serde(default = "default_hatch_rate")]
    pub hatch_rate: String,

    /// Total run time of the attack
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_run_time"
    )]
    pub run_time: Duration,

    /// Account used by the document-editing workload
    #[serde(default = "default_login_email")]
    pub login_email: String,

    /// Password for `login_email`
    #[serde(default = "default_login_password")]
    pub login_password: String,
}

impl Default for LoadgenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            users: default_users(),
            hatch_rate: default_hatch_rate(),
            run_time: default_run_time(),
            login_email: default_login_email(),
            login_password: default_login_password(),
        }
    }
}

impl Validatable for LoadgenConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.host, "host", self.domain_name())?;
        validate_positive(self.users, "users", self.domain_name())?;
        validate_positive(self.run_time.as_secs(), "run_time", self.domain_name())?;

        let rate: f64 = self
            .hatch_rate
            .parse()
            .map_err(|_| self.validation_error(format!("invalid hatch_rate '{}'", self.hatch_rate)))?;
        validate_positive(rate, "hatch_rate", self.domain_name())?;

        validate_required_string(&self.login_email, "login_email", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "loadgen"
    }
}

fn default_host() -> String {
    "http://localhost:8080".to_string()
}

fn default_users() -> usize {
    10
}

fn default_hatch_rate() -> String {
    "1".to_string()
}

fn default_run_time() -> Duration {
    Duration::from_secs(60)
}

fn default_login_email() -> String {
    "admin@example.com".to_string()
}

fn default_login_password() -> String {
    "kapil123".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_loadgen_config_is_valid() {
        assert!(LoadgenConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_hatch_rate() {
        let config = LoadgenConfig {
            hatch_rate: "fast".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = LoadgenConfig {
            hatch_rate: "0".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
