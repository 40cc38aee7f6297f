//! Configuration management command
//!
//! Provides CLI interface to view and edit the autosave settings file.

use crate::system_config;
use anyhow::{Context, Result};
use autosnap_core::AutosaveConfig;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

const KEYS: &[&str] = &[
    "autosave.interval_seconds",
    "autosave.max_backup_files",
    "autosave.default_save_dir",
];

/// List all configuration values
pub async fn run_list(config_path: Option<&Path>) -> Result<()> {
    let path = system_config::resolve_path(config_path)?;
    let config = system_config::load(Some(&path))?;
    let autosave = &config.autosave;

    println!("{}", "Autosave Configuration".bold());
    println!("{}: {}\n", "Location".dimmed(), path.display().dimmed());

    println!("{}", "[autosave]".yellow());
    println!(
        "  {} = {} {}",
        "interval_seconds".cyan(),
        autosave.interval_seconds,
        format!(
            "(effective {}s = {} min)",
            autosave.effective_interval().as_secs(),
            autosave.effective_interval().as_secs() / 60
        )
        .dimmed()
    );
    println!("  {} = {}", "max_backup_files".cyan(), autosave.max_backup_files);
    println!(
        "  {} = {}",
        "default_save_dir".cyan(),
        match autosave.default_dir() {
            Some(dir) => dir.display().to_string(),
            None => "(not set)".dimmed().to_string(),
        }
    );

    println!("\n{}", "Valid Ranges:".bold());
    println!(
        "  interval_seconds: {}-{} (lower values are raised to {})",
        AutosaveConfig::MIN_INTERVAL_SECS,
        AutosaveConfig::MAX_INTERVAL_SECS,
        AutosaveConfig::MIN_INTERVAL_SECS
    );
    println!(
        "  max_backup_files: {}-{}",
        AutosaveConfig::MIN_BACKUP_FILES,
        AutosaveConfig::MAX_BACKUP_FILES
    );
    println!("  default_save_dir: absolute path (\"\" to unset)");

    Ok(())
}

/// Get a single configuration value
pub async fn run_get(config_path: Option<&Path>, key: &str) -> Result<()> {
    let config = system_config::load(config_path)?;
    println!("{}", get_value(&config.autosave, key)?);
    Ok(())
}

/// Set a configuration value
pub async fn run_set(config_path: Option<&Path>, key: &str, value: &str) -> Result<()> {
    let mut config = system_config::load(config_path)?;

    set_value(&mut config.autosave, key, value)?;

    // Validate before saving
    config.validate().context("Invalid configuration value")?;

    system_config::save(config_path, &config)?;

    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    println!("{}", "Note: running autosaves pick this up on their next cycle".dimmed());

    Ok(())
}

/// Show the config file path and optionally create it
pub async fn run_path(config_path: Option<&Path>, create: bool) -> Result<()> {
    let path = system_config::resolve_path(config_path)?;

    if create && !path.exists() {
        system_config::init_if_missing(Some(&path))?;
        println!("{} Created config file at: {}", "✓".green(), path.display());
    } else if path.exists() {
        println!("{}", path.display());
    } else {
        println!("{}", path.display());
        println!("{}", "File does not exist. Use --create to create it.".yellow());
    }

    Ok(())
}

/// Show example configuration
pub async fn run_example() -> Result<()> {
    println!("{}", system_config::example_config());
    Ok(())
}

fn get_value(config: &AutosaveConfig, key: &str) -> Result<String> {
    let value = match key {
        "autosave.interval_seconds" => config.interval_seconds.to_string(),
        "autosave.max_backup_files" => config.max_backup_files.to_string(),
        "autosave.default_save_dir" => config
            .default_dir()
            .map(|dir| dir.display().to_string())
            .unwrap_or_default(),
        _ => return Err(unknown_key(key)),
    };
    Ok(value)
}

fn set_value(config: &mut AutosaveConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "autosave.interval_seconds" => {
            let val: f64 = value.parse().context("Invalid value: must be a number of seconds")?;
            config.interval_seconds = val;
        }
        "autosave.max_backup_files" => {
            let val: usize = value.parse().context("Invalid value: must be a positive integer")?;
            config.max_backup_files = val;
        }
        "autosave.default_save_dir" => {
            config.default_save_dir = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            };
        }
        _ => return Err(unknown_key(key)),
    }
    Ok(())
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Unknown config key: {}. Available keys: {}",
        key,
        KEYS.join(", ")
    )
}
