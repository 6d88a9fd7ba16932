//! Selectable workloads and the attack runner

use crate::errors::{LoadgenError, LoadgenResult};
use crate::scenarios::{hotel_reservation, landing, overleaf};
use goose::config::GooseConfiguration;
use goose::metrics::GooseMetrics;
use goose::prelude::*;
use std::fmt;
use std::str::FromStr;
use testbed_config::LoadgenConfig;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    HotelReservation,
    Overleaf,
    Landing,
}

impl Workload {
    pub const ALL: [Workload; 3] = [
        Workload::HotelReservation,
        Workload::Overleaf,
        Workload::Landing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Workload::HotelReservation => "hotel-reservation",
            Workload::Overleaf => "overleaf",
            Workload::Landing => "landing",
        }
    }

    pub fn scenario(&self, config: &LoadgenConfig) -> Result<Scenario, GooseError> {
        match self {
            Workload::HotelReservation => hotel_reservation::scenario(),
            Workload::Overleaf => overleaf::scenario(overleaf::Credentials {
                email: config.login_email.clone(),
                password: config.login_password.clone(),
            }),
            Workload::Landing => landing::scenario(),
        }
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Workload {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Workload::ALL
            .into_iter()
            .find(|workload| workload.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = Workload::ALL.iter().map(Workload::as_str).collect();
                format!("unknown workload '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// Request totals of a finished attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    pub requests: usize,
    pub failures: usize,
    pub duration_secs: usize,
}

impl LoadSummary {
    pub fn from_metrics(metrics: &GooseMetrics) -> Self {
        let (success, failures) = metrics
            .requests
            .values()
            .fold((0, 0), |(ok, failed), aggregate| {
                (ok + aggregate.success_count, failed + aggregate.fail_count)
            });
        Self {
            requests: success + failures,
            failures,
            duration_secs: metrics.duration,
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.requests == 0 {
            return 100.0;
        }
        (self.requests - self.failures) as f64 / self.requests as f64 * 100.0
    }
}

/// Run `workload` against `config.host` until `config.run_time` elapses
pub async fn run_workload(workload: Workload, config: &LoadgenConfig) -> LoadgenResult<GooseMetrics> {
    if config.users == 0 {
        return Err(LoadgenError::Settings("users must be greater than zero".to_string()));
    }

    info!(
        workload = %workload,
        host = %config.host,
        users = config.users,
        run_time = config.run_time.as_secs(),
        "Starting load test"
    );

    let run_time = config.run_time.as_secs().max(1) as usize;
    let metrics = GooseAttack::initialize_with_config(GooseConfiguration::default())?
        .register_scenario(workload.scenario(config)?)
        .set_default(GooseDefault::Host, config.host.as_str())?
        .set_default(GooseDefault::Users, config.users)?
        .set_default(GooseDefault::HatchRate, config.hatch_rate.as_str())?
        .set_default(GooseDefault::RunTime, run_time)?
        .execute()
        .await?;

    let summary = LoadSummary::from_metrics(&metrics);
    info!(
        workload = %workload,
        requests = summary.requests,
        failures = summary.failures,
        success_rate = summary.success_rate(),
        "Load test complete"
    );
    Ok(metrics)
}
