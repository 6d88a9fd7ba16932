//! CLI argument parsing definitions

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export service metrics from InfluxDB into a timestamped directory
    Export {
        /// Run name appended to the output directory
        #[arg(long, value_name = "NAME")]
        measurement_name: Option<String>,

        /// Directory the run directory is created in
        #[arg(long, value_name = "DIR")]
        output_root: Option<PathBuf>,

        /// Range start (RFC 3339)
        #[arg(long, value_name = "TIME", requires = "end", conflicts_with = "minutes")]
        start: Option<DateTime<Utc>>,

        /// Range end (RFC 3339, exclusive)
        #[arg(long, value_name = "TIME", requires = "start", conflicts_with = "minutes")]
        end: Option<DateTime<Utc>>,

        /// Export the last N minutes instead of the configured lookback
        #[arg(long, value_name = "N")]
        minutes: Option<u64>,
    },

    /// Generate load against a web application
    Load {
        /// Workload: hotel-reservation, overleaf, landing
        #[arg(value_name = "WORKLOAD")]
        workload: String,

        /// Base URL of the system under test
        #[arg(long, value_name = "URL")]
        host: Option<String>,

        /// Number of simulated users
        #[arg(long, value_name = "N")]
        users: Option<usize>,

        /// Users launched per second
        #[arg(long, value_name = "RATE")]
        hatch_rate: Option<String>,

        /// Run time in seconds
        #[arg(long, value_name = "SECS")]
        run_time: Option<u64>,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,
    },

    /// Write a sample configuration file
    Generate {
        /// Output file path
        #[arg(long, value_name = "PATH")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the configuration in use
    Show {
        /// Output format: yaml, json
        #[arg(long, value_name = "FORMAT", default_value = "yaml")]
        format: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_range_arguments() {
        let cli = Cli::try_parse_from([
            "testbed",
            "export",
            "--start",
            "2024-01-01T00:00:00Z",
            "--end",
            "2024-01-01T01:00:00Z",
            "--measurement-name",
            "baseline",
        ])
        .unwrap();

        match cli.command {
            Commands::Export {
                start,
                end,
                measurement_name,
                minutes,
                ..
            } => {
                assert_eq!(start.unwrap().to_rfc3339(), "2024-01-01T00:00:00+00:00");
                assert!(end.is_some());
                assert_eq!(measurement_name.as_deref(), Some("baseline"));
                assert!(minutes.is_none());
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_start_requires_end() {
        assert!(Cli::try_parse_from(["testbed", "export", "--start", "2024-01-01T00:00:00Z"]).is_err());
        assert!(Cli::try_parse_from([
            "testbed",
            "export",
            "--start",
            "2024-01-01T00:00:00Z",
            "--end",
            "2024-01-01T01:00:00Z",
            "--minutes",
            "5"
        ])
        .is_err());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "testbed",
            "load",
            "overleaf",
            "--users",
            "5",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::Load { users: Some(5), .. }));
    }
}
