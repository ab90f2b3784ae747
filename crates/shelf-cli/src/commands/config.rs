//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use shelf_core::Config;

use crate::output::{Output, OutputFormat};

/// Valid keys for `config set`
const KEYS: &str = "data_dir, catalog_file, atomic_save, log_level, log_file";

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "catalog_file": config.catalog_file,
                    "catalog_path": config.catalog_path(),
                    "atomic_save": config.atomic_save,
                    "log_level": config.log_level,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.catalog_path().display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:     {}", config.data_dir.display());
            println!(
                "  catalog_file: {}",
                display_path(config.catalog_file.as_ref())
            );
            println!("  atomic_save:  {}", config.atomic_save);
            println!(
                "  log_level:    {}",
                config.log_level.as_deref().unwrap_or("(not set)")
            );
            println!("  log_file:     {}", display_path(config.log_file.as_ref()));
            println!();
            println!("Catalog:     {}", config.catalog_path().display());
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply one `key = value` assignment
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let optional = |v: &str| -> Option<String> {
        if v.is_empty() || v == "none" {
            None
        } else {
            Some(v.to_string())
        }
    };

    match key {
        "data_dir" => config.data_dir = value.into(),
        "catalog_file" => config.catalog_file = optional(value).map(PathBuf::from),
        "atomic_save" => {
            config.atomic_save = value
                .parse()
                .context("Invalid value for atomic_save. Use 'true' or 'false'.")?;
        }
        "log_level" => config.log_level = optional(value),
        "log_file" => config.log_file = optional(value).map(PathBuf::from),
        _ => {
            bail!(
                "Unknown configuration key: '{}'\nValid keys: {}",
                key,
                KEYS
            );
        }
    }

    Ok(())
}

fn display_path(path: Option<&PathBuf>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not set)".to_string())
}
