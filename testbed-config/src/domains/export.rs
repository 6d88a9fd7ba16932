//! Metrics export configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Services exported by default, in manifest order
pub const DEFAULT_SERVICES: &[&str] = &[
    "chat",
    "clsi",
    "contacts",
    "doc-updater",
    "docstore",
    "filestore",
    "haproxy",
    "mongodb",
    "postgresql",
    "real-time",
    "redis",
    "spelling",
    "tags",
    "track-changes",
    "web",
    "loadgenerator",
];

/// Settings for one metrics export run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory under which each run creates its own subdirectory
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Run name, appended to the timestamped directory name
    #[serde(default = "default_measurement_name")]
    pub measurement_name: String,

    /// Free-form description written to the manifest
    #[serde(default)]
    pub description: String,

    /// Length of the exported range when no explicit range is given
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_lookback"
    )]
    pub lookback: Duration,

    /// Size of each paginated query window
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_scroll_window"
    )]
    pub scroll_window: Duration,

    /// Value of the `io.rancher.stack.name` label on exported containers
    #[serde(default = "default_stack_name")]
    pub stack_name: String,

    /// Services to export, in manifest order
    #[serde(default = "default_services")]
    pub services: Vec<String>,

    /// Container image regex overrides keyed by service name
    #[serde(default = "default_image_patterns")]
    pub image_patterns: BTreeMap<String, String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_root: default_output_root(),
            measurement_name: default_measurement_name(),
            description: String::new(),
            lookback: default_lookback(),
            scroll_window: default_scroll_window(),
            stack_name: default_stack_name(),
            services: default_services(),
            image_patterns: default_image_patterns(),
        }
    }
}

impl Validatable for ExportConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(
            &self.measurement_name,
            "measurement_name",
            self.domain_name(),
        )?;
        if self.measurement_name.contains(std::path::is_separator) {
            return Err(self.validation_error("measurement_name cannot contain path separators"));
        }

        validate_required_string(&self.stack_name, "stack_name", self.domain_name())?;
        validate_positive(self.lookback.as_secs(), "lookback", self.domain_name())?;
        validate_positive(
            self.scroll_window.as_secs(),
            "scroll_window",
            self.domain_name(),
        )?;

        if self.services.is_empty() {
            return Err(self.validation_error("services cannot be empty"));
        }
        for service in &self.services {
            validate_required_string(service, "services[]", self.domain_name())?;
        }

        for (service, pattern) in &self.image_patterns {
            if pattern.is_empty() {
                return Err(
                    self.validation_error(format!("image pattern for {} is empty", service))
                );
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "export"
    }
}

fn default_output_root() -> PathBuf {
    PathBuf::from("test")
}

fn default_measurement_name() -> String {
    "test".to_string()
}

fn default_lookback() -> Duration {
    Duration::from_secs(60 * 60)
}

fn default_scroll_window() -> Duration {
    Duration::from_secs(4 * 60)
}

fn default_stack_name() -> String {
    "sharelatex".to_string()
}

fn default_services() -> Vec<String> {
    DEFAULT_SERVICES.iter().map(|s| s.to_string()).collect()
}

fn default_image_patterns() -> BTreeMap<String, String> {
    BTreeMap::from([(
        "haproxy".to_string(),
        ".*agent-instance:[^:]+$".to_string(),
    )])
}
