//! A document host backed by a file on disk
//!
//! The "document" is the source file itself. Saving a copy duplicates its
//! current bytes to the snapshot path.

use autosnap_core::SaveError;
use autosnap_scheduler::DocumentHost;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extension used when the source file has none
pub const FALLBACK_EXTENSION: &str = "autosave";

/// Host for a single on-disk file
#[derive(Debug, Clone)]
pub struct FileDocument {
    source: PathBuf,
    untitled: bool,
    prompts: usize,
}

impl FileDocument {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            untitled: false,
            prompts: 0,
        }
    }

    /// Treat the document as never saved, so it has no current path
    pub fn untitled(mut self, untitled: bool) -> Self {
        self.untitled = untitled;
        self
    }

    /// Number of times the user was asked to save
    pub fn prompts(&self) -> usize {
        self.prompts
    }
}

impl DocumentHost for FileDocument {
    fn current_document_path(&self) -> Option<PathBuf> {
        if self.untitled {
            None
        } else {
            Some(self.source.clone())
        }
    }

    fn file_extension(&self) -> String {
        self.source
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .unwrap_or(FALLBACK_EXTENSION)
            .to_string()
    }

    fn save_copy(&mut self, path: &Path) -> Result<(), SaveError> {
        let bytes = std::fs::copy(&self.source, path)
            .map_err(|e| SaveError::new(path, e.to_string()))?;
        debug!("Copied {} bytes from {} to {}", bytes, self.source.display(), path.display());
        Ok(())
    }

    fn prompt_user_to_save(&mut self) {
        self.prompts += 1;
        warn!("No safe autosave location for {}", self.source.display());
        eprintln!(
            "{} {} {}",
            "Autosave is paused:".yellow().bold(),
            "save the document or set autosave.default_save_dir".yellow(),
            "(autosnap config set autosave.default_save_dir <DIR>)".dimmed()
        );
    }
}
