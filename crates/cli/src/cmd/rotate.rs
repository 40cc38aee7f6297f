//! Prune old snapshots of one document

use crate::util;
use anyhow::{Context, Result};
use autosnap_rotation::BackupRotator;
use owo_colors::OwoColorize;
use std::path::Path;

pub async fn run(
    directory: &Path,
    base_name: &str,
    extension: &str,
    keep: usize,
    dry_run: bool,
) -> Result<()> {
    let rotator = BackupRotator::new(directory, base_name, extension, keep);
    let plan = rotator
        .plan()
        .with_context(|| format!("Failed to list snapshots in {}", directory.display()))?;

    let total = plan.keep.len() + plan.remove.len();
    println!(
        "{} {} snapshot{} of {} in {}",
        "Found".bold(),
        total,
        if total == 1 { "" } else { "s" },
        base_name.cyan(),
        directory.display()
    );

    for file in &plan.keep {
        println!(
            "  {} {} {}",
            "keep".green(),
            file.file_name,
            format!(
                "({}, {})",
                util::format_size(util::file_size(&file.path)),
                util::format_relative_time(file.modified)
            )
            .dimmed()
        );
    }
    for file in &plan.remove {
        println!(
            "  {} {} {}",
            if dry_run { "would remove".yellow().to_string() } else { "remove".red().to_string() },
            file.file_name,
            format!("({})", util::format_relative_time(file.modified)).dimmed()
        );
    }

    if dry_run {
        println!(
            "\n{} {} file{} would be removed",
            "Dry run:".bold(),
            plan.remove.len(),
            if plan.remove.len() == 1 { "" } else { "s" }
        );
        return Ok(());
    }

    let report = plan.execute();
    if !report.is_clean() {
        for failure in &report.failed {
            eprintln!("{} {}: {}", "Could not remove".red(), failure.path.display(), failure.error);
        }
        anyhow::bail!("{} snapshot(s) could not be removed", report.failed.len());
    }

    println!(
        "\n{} Removed {}, kept {}",
        "✓".green(),
        report.deleted.len(),
        report.retained.len()
    );
    Ok(())
}
