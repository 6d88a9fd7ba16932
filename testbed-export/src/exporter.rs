//! Export orchestration

use crate::autoscaling::dump_autoscaling;
use crate::descriptor::AutoscalingDescriptor;
use crate::dumper::{ImagePatterns, ServiceDump, ServiceDumper};
use crate::errors::{ExportError, ExportResult};
use crate::manifest::Manifest;
use crate::window::TimeRange;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;
use testbed_config::ExportConfig;
use testbed_influx::QueryClient;
use tracing::info;

/// Run-level settings derived from the `export` configuration domain
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub output_root: PathBuf,
    pub measurement_name: String,
    pub description: String,
    pub scroll_window: Duration,
    pub stack_name: String,
    pub services: Vec<String>,
    pub image_patterns: ImagePatterns,
}

impl From<&ExportConfig> for ExportSettings {
    fn from(config: &ExportConfig) -> Self {
        Self {
            output_root: config.output_root.clone(),
            measurement_name: config.measurement_name.clone(),
            description: config.description.clone(),
            scroll_window: config.scroll_window,
            stack_name: config.stack_name.clone(),
            services: config.services.clone(),
            image_patterns: ImagePatterns::new(config.image_patterns.clone()),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self::from(&ExportConfig::default())
    }
}

/// Outcome of a completed export run
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub manifest: Manifest,
    pub services: Vec<ServiceDump>,
    pub autoscaling_rows: usize,
}

impl ExportReport {
    pub fn total_rows(&self) -> usize {
        self.services.iter().map(|s| s.rows_written).sum::<usize>() + self.autoscaling_rows
    }
}

/// Drives a whole export run against one query client
pub struct Exporter<C: QueryClient> {
    client: C,
    settings: ExportSettings,
}

impl<C: QueryClient> Exporter<C> {
    pub fn new(client: C, settings: ExportSettings) -> Self {
        Self { client, settings }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// `<output_root>/<YYYYMMDDHHMMSS>-<measurement_name>`
    pub fn output_dir(&self, run_started: DateTime<Utc>) -> PathBuf {
        self.settings.output_root.join(format!(
            "{}-{}",
            run_started.format("%Y%m%d%H%M%S"),
            self.settings.measurement_name
        ))
    }

    /// Export `range`, naming the output directory after the current time
    pub async fn export(&self, range: TimeRange) -> ExportResult<ExportReport> {
        self.export_at(Utc::now(), range).await
    }

    pub async fn export_at(
        &self,
        run_started: DateTime<Utc>,
        range: TimeRange,
    ) -> ExportResult<ExportReport> {
        let output_dir = self.output_dir(run_started);
        tokio::fs::create_dir_all(&output_dir)
            .await
            .map_err(|e| ExportError::io(&output_dir, "create directory", e))?;

        info!(
            dir = %output_dir.display(),
            start = %range.start,
            end = %range.end,
            services = self.settings.services.len(),
            "Starting metrics export"
        );

        let mut manifest = Manifest::new(
            self.settings.measurement_name.clone(),
            self.settings.description.clone(),
            range,
        );

        let dumper = ServiceDumper::new(&self.client, range)
            .with_window(self.settings.scroll_window)
            .with_stack_name(self.settings.stack_name.clone())
            .with_patterns(self.settings.image_patterns.clone());

        let mut services = Vec::with_capacity(self.settings.services.len());
        for service in &self.settings.services {
            let dump = dumper.dump(service, &output_dir).await?;
            manifest.push_service(dump.descriptor.clone());
            services.push(dump);
        }

        let autoscaling_rows = self.export_autoscaling(range, &output_dir).await?;
        let manifest_path = manifest.write_to(&output_dir).await?;

        let report = ExportReport {
            output_dir,
            manifest_path,
            manifest,
            services,
            autoscaling_rows,
        };
        info!(
            dir = %report.output_dir.display(),
            rows = report.total_rows(),
            "Metrics export complete"
        );
        Ok(report)
    }

    async fn export_autoscaling(&self, range: TimeRange, dir: &Path) -> ExportResult<usize> {
        let path = dir.join(AutoscalingDescriptor::FILENAME);
        dump_autoscaling(&self.client, range, self.settings.scroll_window, &path)
            .await
            .map_err(|source| ExportError::Service {
                service: AutoscalingDescriptor::NAME.to_string(),
                source: Box::new(source),
            })
    }
}
