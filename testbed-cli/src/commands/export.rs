//! `testbed export`

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;
use testbed_config::TestbedConfig;

/// Options given on the command line, overriding the `export` domain
#[derive(Debug, Clone, Default)]
pub struct ExportArgs {
    pub measurement_name: Option<String>,
    pub output_root: Option<PathBuf>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub minutes: Option<u64>,
}

impl ExportArgs {
    /// Explicit `start`/`end`, else the last `minutes` (or `lookback`) before `now`
    pub fn resolve_range(
        &self,
        lookback: Duration,
        now: DateTime<Utc>,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                if start > end {
                    return Err(anyhow::anyhow!(
                        "--start {} is after --end {}",
                        start.to_rfc3339(),
                        end.to_rfc3339()
                    ));
                }
                Ok((start, end))
            }
            (None, None) => {
                let span = match self.minutes {
                    Some(m) => m
                        .checked_mul(60)
                        .map(Duration::from_secs)
                        .with_context(|| format!("--minutes {} is too large", m))?,
                    None => lookback,
                };
                let start = chrono::TimeDelta::from_std(span)
                    .ok()
                    .and_then(|span| now.checked_sub_signed(span))
                    .with_context(|| format!("Export range of {:?} is too long", span))?;
                Ok((start, now))
            }
            _ => Err(anyhow::anyhow!("--start and --end must be given together")),
        }
    }
}

#[cfg(feature = "export")]
pub async fn export_command(config: &TestbedConfig, args: ExportArgs) -> Result<()> {
    use testbed_config::validation::Validatable;
    use testbed_export::{ExportSettings, Exporter, TimeRange};
    use testbed_influx::{InfluxClient, InfluxConfig};
    use tracing::info;

    let mut export_config = config.export.clone();
    if let Some(name) = &args.measurement_name {
        export_config.measurement_name = name.clone();
    }
    if let Some(root) = &args.output_root {
        export_config.output_root = root.clone();
    }
    export_config
        .validate()
        .context("Invalid export settings")?;

    let (start, end) = args.resolve_range(export_config.lookback, Utc::now())?;
    let range = TimeRange::new(start, end).context("Invalid export range")?;

    let client = InfluxClient::new(InfluxConfig::from(config.influxdb.clone()))
        .context("Failed to create InfluxDB client")?;
    client
        .ping()
        .await
        .with_context(|| format!("InfluxDB at {} is not reachable", config.influxdb.base_url()))?;

    let exporter = Exporter::new(client, ExportSettings::from(&export_config));
    let report = exporter.export(range).await.context("Metrics export failed")?;

    for dump in &report.services {
        info!(
            service = dump.descriptor.name(),
            rows = dump.rows_written,
            queries = dump.queries_issued,
            "Service summary"
        );
    }
    println!("{}", report.output_dir.display());
    Ok(())
}

#[cfg(not(feature = "export"))]
pub async fn export_command(_config: &TestbedConfig, _args: ExportArgs) -> Result<()> {
    Err(anyhow::anyhow!(
        "Export functionality not available. Build with --features=export"
    ))
}
