//! Show where the next autosave of a file would go

use crate::file_host::FileDocument;
use crate::system_config::{self, Overrides, TomlSettings};
use crate::util;
use anyhow::Result;
use autosnap_core::{
    DocumentLocation, ForbiddenPathSet, PathPolicy, PolicyInput, PromptState, Resolution,
    SaveDestination, SkipReason,
};
use autosnap_scheduler::{
    Clock, DocumentHost, Environment, SettingsSource, SystemClock, SystemEnvironment,
};
use owo_colors::OwoColorize;
use std::path::Path;

pub async fn run(
    source: &Path,
    untitled: bool,
    config_path: Option<&Path>,
    overrides: Overrides,
) -> Result<()> {
    let source = util::absolute(source)?;
    let host = FileDocument::new(&source).untitled(untitled);

    let settings =
        TomlSettings::new(system_config::resolve_path(config_path)?).with_overrides(overrides);
    let config = settings.read_config()?;

    let forbidden = ForbiddenPathSet::resolve(SystemEnvironment::new().forbidden_directories());
    let document = DocumentLocation {
        current_path: host.current_document_path(),
    };
    let input = PolicyInput::gather(&document, &config);

    println!("{}", "Autosave destination".bold());
    match &document.current_path {
        Some(path) => println!("  {}: {}", "document".cyan(), path.display()),
        None => println!("  {}: {}", "document".cyan(), "(never saved)".dimmed()),
    }
    match config.default_dir() {
        Some(dir) if input.default_dir.is_some() => {
            println!("  {}: {}", "default dir".cyan(), dir.display())
        }
        Some(dir) => println!(
            "  {}: {} {}",
            "default dir".cyan(),
            dir.display(),
            "(missing, ignored)".yellow()
        ),
        None => println!("  {}: {}", "default dir".cyan(), "(not set)".dimmed()),
    }
    if let Some(doc) = &input.document {
        if forbidden.contains(&doc.canonical) {
            println!("  {}", "document is inside a protected directory".yellow());
        }
    }
    println!();

    // A fresh prompt state, so the answer is what the first cycle would do
    let mut prompt = PromptState::new();
    match PathPolicy::resolve(&input, &forbidden, &mut prompt) {
        Resolution::Target(target) => {
            let next = SaveDestination::new(&target, &host.file_extension(), SystemClock.now());
            println!("{}: {}", "Destination".green().bold(), target.directory.display());
            println!("{}: {}", "Next file".green().bold(), file_name(&next.new_file_path));
        }
        Resolution::Prompt => {
            println!(
                "{}",
                "No destination: the first cycle will ask the user to save the document".yellow()
            );
        }
        Resolution::Skip(SkipReason::NoSafeDestination)
        | Resolution::Skip(SkipReason::AlreadyPrompted) => {
            println!("{}", "No destination: autosave will be skipped".yellow());
        }
    }

    println!("\n{}", "Protected directories:".dimmed());
    for prefix in forbidden.prefixes() {
        println!("  {}", prefix.display().dimmed());
    }

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
