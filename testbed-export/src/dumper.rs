//! Per-service export: schema discovery, merged scrolls, TSV output

use crate::descriptor::ServiceDescriptor;
use crate::errors::{ExportError, ExportResult};
use crate::merge::MergedScroll;
use crate::scroll::{QueryTemplate, Scroll};
use crate::schema::discover_schema;
use crate::tsv::TsvWriter;
use crate::window::{TimeRange, DEFAULT_SCROLL_WINDOW};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use testbed_influx::QueryClient;
use tracing::{debug, info};

/// Per-container resource categories, each stored as `docker_container_<name>`
pub const SYSTEM_METRICS: [&str; 4] = ["cpu", "blkio", "mem", "net"];

/// Container label holding the deployment stack name
pub const STACK_LABEL: &str = "io.rancher.stack.name";

pub const DEFAULT_STACK_NAME: &str = "sharelatex";

/// Container image regex per service
///
/// Services without an override match `.*<name>:latest$`. `{name}` inside an
/// override is replaced by the service name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePatterns {
    overrides: BTreeMap<String, String>,
}

impl ImagePatterns {
    pub const DEFAULT_PATTERN: &'static str = ".*{name}:latest$";

    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    pub fn with_override(mut self, service: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.overrides.insert(service.into(), pattern.into());
        self
    }

    pub fn pattern_for(&self, service: &str) -> String {
        self.overrides
            .get(service)
            .map(String::as_str)
            .unwrap_or(Self::DEFAULT_PATTERN)
            .replace("{name}", service)
    }
}

impl Default for ImagePatterns {
    fn default() -> Self {
        Self::new(BTreeMap::new()).with_override("haproxy", ".*agent-instance:[^:]+$")
    }
}

/// Result of dumping one service
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDump {
    pub descriptor: ServiceDescriptor,
    pub rows_written: usize,
    pub queries_issued: usize,
}

pub struct ServiceDumper<'c> {
    client: &'c dyn QueryClient,
    range: TimeRange,
    window: Duration,
    stack_name: String,
    patterns: ImagePatterns,
}

impl<'c> ServiceDumper<'c> {
    pub fn new(client: &'c dyn QueryClient, range: TimeRange) -> Self {
        Self {
            client,
            range,
            window: DEFAULT_SCROLL_WINDOW,
            stack_name: DEFAULT_STACK_NAME.to_string(),
            patterns: ImagePatterns::default(),
        }
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn with_stack_name(mut self, stack_name: impl Into<String>) -> Self {
        self.stack_name = stack_name.into();
        self
    }

    pub fn with_patterns(mut self, patterns: ImagePatterns) -> Self {
        self.patterns = patterns;
        self
    }

    /// Query template for one resource category of the service's containers
    pub fn system_query(&self, service: &str, system: &str) -> QueryTemplate {
        QueryTemplate::select_all(
            &format!("docker_container_{}", system),
            &[
                format!("\"{}\" = '{}'", STACK_LABEL, self.stack_name),
                format!("container_image =~ /{}/", self.patterns.pattern_for(service)),
            ],
        )
    }

    /// Query template for the service's own measurement
    pub fn service_query(&self, service: &str) -> QueryTemplate {
        QueryTemplate::select_all(service, &[])
    }

    /// Write `<dir>/<service>.tsv.gz` and return its descriptor
    ///
    /// Nothing is cleaned up on failure; a partially written file stays.
    pub async fn dump(&self, service: &str, dir: &Path) -> ExportResult<ServiceDump> {
        self.dump_inner(service, dir)
            .await
            .map_err(|source| ExportError::Service {
                service: service.to_string(),
                source: Box::new(source),
            })
    }

    async fn dump_inner(&self, service: &str, dir: &Path) -> ExportResult<ServiceDump> {
        let descriptor = discover_schema(self.client, service).await?;

        let mut scrolls = Vec::with_capacity(SYSTEM_METRICS.len() + 1);
        for system in SYSTEM_METRICS {
            scrolls.push(Scroll::new(
                self.client,
                self.system_query(service, system),
                self.range,
                self.window,
            )?);
        }
        scrolls.push(
            Scroll::new(
                self.client,
                self.service_query(service),
                self.range,
                self.window,
            )?
            .with_prefix(service),
        );
        let mut merged = MergedScroll::new(scrolls);

        let path = dir.join(descriptor.filename());
        let mut writer = TsvWriter::create(&path, &descriptor.columns())?;
        while let Some(scrolled) = merged.next_row().await? {
            writer.write_row(&scrolled.row)?;
        }
        let rows_written = writer.finish()?;

        // catalog queries included
        let queries_issued = merged.queries_issued() + 2;
        debug!(service, queries_issued, "Service scrolls drained");
        info!(service, rows = rows_written, file = %path.display(), "Exported service");

        Ok(ServiceDump {
            descriptor,
            rows_written,
            queries_issued,
        })
    }
}
