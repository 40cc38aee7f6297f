//! Destination resolution for autosaves
//!
//! Decides where the next snapshot goes:
//! 1. Next to the document, unless it lives in a forbidden location
//! 2. Otherwise in the configured default directory
//! 3. Otherwise nowhere; an unsaved document triggers one prompt per activation

use crate::config::AutosaveConfig;
use crate::document::{DocumentLocation, SaveTarget};
use crate::forbidden::{canonical_or_normalized, ForbiddenPathSet};
use crate::naming::UNTITLED_BASE_NAME;
use std::path::{Path, PathBuf};

/// Whether the user has been asked to save during the current activation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptState {
    fired: bool,
}

impl PromptState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Mark the prompt as fired; returns false if it already was
    pub fn try_fire(&mut self) -> bool {
        !std::mem::replace(&mut self.fired, true)
    }

    /// Forget the prompt (new activation)
    pub fn reset(&mut self) {
        self.fired = false;
    }
}

/// Why a cycle writes nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Saved document with no safe directory and no usable default
    NoSafeDestination,
    /// Unsaved document, and the user was already prompted this activation
    AlreadyPrompted,
}

/// Outcome of destination resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Write the snapshot here
    Target(SaveTarget),
    /// Ask the user to save the document (caller invokes the prompt once)
    Prompt,
    /// Nothing to do this cycle
    Skip(SkipReason),
}

/// A document path together with its canonical form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPath {
    pub original: PathBuf,
    pub canonical: PathBuf,
}

/// Filesystem facts the policy decides on
///
/// Gathering does the I/O (canonicalization, directory checks) so that
/// [`PathPolicy::resolve`] stays a pure function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyInput {
    pub document: Option<DocumentPath>,
    /// Canonical default directory, present only if it exists and is absolute
    pub default_dir: Option<PathBuf>,
}

impl PolicyInput {
    /// Probe the filesystem for the document and the configured default dir
    pub fn gather(document: &DocumentLocation, config: &AutosaveConfig) -> Self {
        let document = document
            .current_path
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|original| DocumentPath {
                original: original.clone(),
                canonical: canonical_or_normalized(original),
            });

        let default_dir = config
            .default_dir()
            .filter(|dir| dir.is_absolute() && dir.is_dir())
            .map(canonical_or_normalized);

        Self {
            document,
            default_dir,
        }
    }
}

/// Destination resolver
pub struct PathPolicy;

impl PathPolicy {
    /// Decide where this cycle's snapshot goes
    ///
    /// Never returns a directory inside `forbidden`. When it returns
    /// [`Resolution::Prompt`] the prompt state has already been marked.
    pub fn resolve(
        input: &PolicyInput,
        forbidden: &ForbiddenPathSet,
        prompt: &mut PromptState,
    ) -> Resolution {
        let document_stem = input.document.as_ref().and_then(|doc| file_stem(&doc.original));

        // 1. Alongside the document
        if let Some(doc) = &input.document {
            if !forbidden.contains(&doc.canonical) {
                if let (Some(dir), Some(stem)) = (doc.canonical.parent(), document_stem.as_ref()) {
                    if !dir.as_os_str().is_empty() && !forbidden.contains(dir) {
                        return Resolution::Target(SaveTarget {
                            directory: dir.to_path_buf(),
                            base_name: stem.clone(),
                        });
                    }
                }
            }
        }

        // 2. Configured default directory
        if let Some(dir) = &input.default_dir {
            if !forbidden.contains(dir) {
                return Resolution::Target(SaveTarget {
                    directory: dir.clone(),
                    base_name: document_stem.unwrap_or_else(|| UNTITLED_BASE_NAME.to_string()),
                });
            }
        }

        // 3. No destination
        if input.document.is_some() {
            Resolution::Skip(SkipReason::NoSafeDestination)
        } else if prompt.try_fire() {
            Resolution::Prompt
        } else {
            Resolution::Skip(SkipReason::AlreadyPrompted)
        }
    }

    /// Gather inputs and resolve in one step
    pub fn resolve_for(
        document: &DocumentLocation,
        config: &AutosaveConfig,
        forbidden: &ForbiddenPathSet,
        prompt: &mut PromptState,
    ) -> Resolution {
        let input = PolicyInput::gather(document, config);
        Self::resolve(&input, forbidden, prompt)
    }
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}
