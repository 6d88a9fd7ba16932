//! Load generation for the testbed
//!
//! Each workload is a goose [`Scenario`](goose::goose::Scenario) built from a
//! weighted transaction table. Request paths are produced by plain functions
//! over an [`Rng`](rand::Rng) so their distributions can be tested without a
//! running attack.

pub mod errors;
pub mod scenarios;
pub mod workload;

pub use errors::{LoadgenError, LoadgenResult};
pub use workload::{run_workload, LoadSummary, Workload};
