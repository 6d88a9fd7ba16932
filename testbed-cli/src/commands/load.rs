//! `testbed load`

use anyhow::Result;
use std::time::Duration;
use testbed_config::{LoadgenConfig, TestbedConfig};

/// Options given on the command line, overriding the `loadgen` domain
#[derive(Debug, Clone, Default)]
pub struct LoadArgs {
    pub workload: String,
    pub host: Option<String>,
    pub users: Option<usize>,
    pub hatch_rate: Option<String>,
    pub run_time: Option<u64>,
}

impl LoadArgs {
    pub fn apply(&self, config: &LoadgenConfig) -> LoadgenConfig {
        let mut config = config.clone();
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(users) = self.users {
            config.users = users;
        }
        if let Some(rate) = &self.hatch_rate {
            config.hatch_rate = rate.clone();
        }
        if let Some(secs) = self.run_time {
            config.run_time = Duration::from_secs(secs);
        }
        config
    }
}

#[cfg(feature = "load")]
pub async fn load_command(config: &TestbedConfig, args: LoadArgs) -> Result<()> {
    use anyhow::Context;
    use testbed_config::validation::Validatable;
    use testbed_loadgen::{run_workload, LoadSummary, Workload};

    let workload: Workload = args.workload.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let loadgen = args.apply(&config.loadgen);
    loadgen.validate().context("Invalid load generator settings")?;

    let metrics = run_workload(workload, &loadgen)
        .await
        .map_err(|e| anyhow::anyhow!("Workload {} failed: {}", workload, e))?;

    let summary = LoadSummary::from_metrics(&metrics);
    println!(
        "{}: {} requests, {} failed ({:.1}% success) in {}s",
        workload,
        summary.requests,
        summary.failures,
        summary.success_rate(),
        summary.duration_secs
    );
    Ok(())
}

#[cfg(not(feature = "load"))]
pub async fn load_command(_config: &TestbedConfig, _args: LoadArgs) -> Result<()> {
    Err(anyhow::anyhow!(
        "Load generation not available. Build with --features=load"
    ))
}
