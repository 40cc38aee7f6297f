//! Autosave a file until interrupted

use crate::file_host::FileDocument;
use crate::system_config::{self, Overrides, TomlSettings};
use crate::util;
use anyhow::{Context, Result};
use autosnap_core::SkipReason;
use autosnap_scheduler::{
    AutosaveScheduler, AutosaveService, SettingsSource, SystemEnvironment, TickOutcome,
};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments for `autosnap run`
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub source: PathBuf,
    pub untitled: bool,
    pub once: bool,
    pub config_path: Option<PathBuf>,
    pub overrides: Overrides,
}

pub async fn run(options: RunOptions) -> Result<()> {
    let source = util::absolute(&options.source)?;
    if !source.is_file() {
        anyhow::bail!("Source file not found: {}", source.display());
    }

    let config_path = system_config::resolve_path(options.config_path.as_deref())?;
    let settings = TomlSettings::new(config_path).with_overrides(options.overrides);
    let host = FileDocument::new(&source).untitled(options.untitled);
    let scheduler = AutosaveScheduler::new(host, settings.clone())
        .with_environment(SystemEnvironment::new());

    if options.once {
        run_once(scheduler)
    } else {
        run_until_interrupted(scheduler, &source, &settings).await
    }
}

/// Run a single cycle immediately and report it
fn run_once(mut scheduler: AutosaveScheduler<FileDocument>) -> Result<()> {
    let Some(first) = scheduler.start() else {
        anyhow::bail!("Autosave scheduler did not start");
    };

    scheduler.tick(first.activation);
    scheduler.stop();

    match scheduler.last_outcome() {
        Some(outcome) => report(outcome),
        None => anyhow::bail!("Autosave cycle did not run"),
    }
}

async fn run_until_interrupted(
    scheduler: AutosaveScheduler<FileDocument>,
    source: &Path,
    settings: &TomlSettings,
) -> Result<()> {
    let service = AutosaveService::new(scheduler);
    service.start();

    println!("{} {}", "Autosaving".green().bold(), source.display());
    match settings.read_config() {
        Ok(config) => println!(
            "  {} every {}s, keeping {} {}",
            "interval:".dimmed(),
            config.effective_interval().as_secs(),
            config.effective_max_backups(),
            if config.effective_max_backups() == 1 { "copy" } else { "copies" }
        ),
        Err(e) => println!("  {} {}", "settings:".dimmed(), e.to_string().yellow()),
    }
    println!("  {} {}", "settings file:".dimmed(), settings.path().display());
    println!("{}", "Press Ctrl-C to stop".dimmed());

    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;

    let (ticks, prompts) = service.with_scheduler(|s| (s.ticks_run(), s.host().prompts()));
    service.shutdown().await;
    info!("Autosave stopped after {} cycles ({} prompts)", ticks, prompts);
    println!("\n{} after {} cycles", "Stopped".bold(), ticks);

    Ok(())
}

/// Print a cycle outcome; failures become an error exit
pub fn report(outcome: &TickOutcome) -> Result<()> {
    match outcome {
        TickOutcome::Saved { path, rotation } => {
            println!("{} Autosaved to {}", "✓".green(), path.display());
            for removed in &rotation.deleted {
                println!("  {} {}", "removed".dimmed(), removed.display());
            }
            for failure in &rotation.failed {
                println!(
                    "  {} {}: {}",
                    "could not remove".yellow(),
                    failure.path.display(),
                    failure.error
                );
            }
            Ok(())
        }
        TickOutcome::RotationFailed { path, error } => {
            println!("{} Autosaved to {}", "✓".green(), path.display());
            println!("  {} {}", "rotation failed:".yellow(), error);
            Ok(())
        }
        TickOutcome::Prompted => {
            println!("{}", "No save location; asked the user to save".yellow());
            Ok(())
        }
        TickOutcome::Skipped(SkipReason::NoSafeDestination) => {
            println!(
                "{} {}",
                "Skipped: document is in a protected directory".yellow(),
                "and no default_save_dir is set".yellow()
            );
            Ok(())
        }
        TickOutcome::Skipped(SkipReason::AlreadyPrompted) => {
            println!("{}", "Skipped: waiting for the user to save".dimmed());
            Ok(())
        }
        TickOutcome::ConfigUnavailable(message) => {
            anyhow::bail!("Settings unavailable: {}", message)
        }
        TickOutcome::DestinationFailed(e) => Err(anyhow::anyhow!("{}", e)),
        TickOutcome::SaveFailed(e) => Err(anyhow::anyhow!("{}", e)),
    }
}
