//! `testbed config` subcommands

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use testbed_config::{ConfigLoader, TestbedConfig};
use tracing::info;

/// Handle configuration validation
pub fn handle_config_validate(config_file: &Path) -> Result<()> {
    info!("Validating configuration file: {:?}", config_file);

    if !config_file.exists() {
        return Err(anyhow::anyhow!(
            "Configuration file not found: {:?}",
            config_file
        ));
    }

    ConfigLoader::new()
        .from_file(config_file)
        .with_context(|| format!("Configuration file {:?} is invalid", config_file))?;

    println!("Configuration file {:?} is valid", config_file);
    Ok(())
}

/// Handle sample configuration generation
pub fn handle_config_generate(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        return Err(anyhow::anyhow!(
            "Output file {:?} already exists. Use --force to overwrite.",
            output
        ));
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    fs::write(output, TestbedConfig::generate_sample())
        .context("Failed to write configuration file")?;

    println!("Sample configuration written to {:?}", output);
    println!("Validate with: testbed config validate --config-file {:?}", output);
    Ok(())
}

/// Render configuration as YAML or JSON
pub fn render_config(config: &TestbedConfig, format: &str) -> Result<String> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    match format.to_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml::to_string(&value).context("Failed to serialize to YAML"),
        "json" => serde_json::to_string_pretty(&value).context("Failed to serialize to JSON"),
        _ => Err(anyhow::anyhow!(
            "Unknown output format: {}. Valid formats: yaml, json",
            format
        )),
    }
}

/// Handle configuration display
pub fn handle_config_show(config: &TestbedConfig, format: &str) -> Result<()> {
    println!("{}", render_config(config, format)?);
    Ok(())
}
