use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, warn};

mod cli;
mod commands;

use cli::{Cli, Commands, ConfigCommands};
use commands::{
    export_command, handle_config_generate, handle_config_show, handle_config_validate,
    load_command, ExportArgs, LoadArgs,
};
use testbed_config::{ConfigLoader, LoggingConfig, TestbedConfig};
use testbed_logging::{init_logging_from_config, init_simple_tracing, LogLevel};

/// Load configuration from file or use defaults
fn load_config(config_path: Option<&PathBuf>) -> Result<TestbedConfig> {
    let loader = ConfigLoader::new();

    match config_path {
        Some(path) => {
            if path.exists() {
                info!("Loading configuration from: {:?}", path);
                loader
                    .from_file(path)
                    .context(format!("Failed to load configuration from {:?}", path))
            } else {
                warn!("Configuration file not found: {:?}. Using defaults.", path);
                loader
                    .from_env()
                    .context("Failed to load configuration from environment")
            }
        }
        None => {
            debug!("No configuration file specified. Loading from environment or defaults.");
            loader
                .from_env()
                .context("Failed to load configuration from environment")
        }
    }
}

/// Initialize logging from configuration, with `--log-level` taking precedence
fn init_logging(config: &LoggingConfig, log_level: Option<&String>) -> Result<()> {
    match log_level {
        Some(level) => match level.parse::<LogLevel>() {
            Ok(level) => {
                let mut config = config.clone();
                config.level = level;
                init_logging_from_config(&config)
            }
            Err(_) => init_simple_tracing(level),
        },
        None => init_logging_from_config(config),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first
    let config = load_config(cli.config.as_ref())?;
    init_logging(&config.logging, cli.log_level.as_ref())?;

    debug!("Testbed CLI starting");

    match cli.command {
        Commands::Export {
            measurement_name,
            output_root,
            start,
            end,
            minutes,
        } => {
            let args = ExportArgs {
                measurement_name,
                output_root,
                start,
                end,
                minutes,
            };
            export_command(&config, args).await
        }
        Commands::Load {
            workload,
            host,
            users,
            hatch_rate,
            run_time,
        } => {
            let args = LoadArgs {
                workload,
                host,
                users,
                hatch_rate,
                run_time,
            };
            load_command(&config, args).await
        }
        Commands::Config { config_cmd } => match config_cmd {
            ConfigCommands::Validate { config_file } => handle_config_validate(&config_file),
            ConfigCommands::Generate { output, force } => handle_config_generate(&output, force),
            ConfigCommands::Show { format } => handle_config_show(&config, &format),
        },
    }
}
