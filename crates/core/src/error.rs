//! Error types shared by autosnap crates

use std::path::PathBuf;
use thiserror::Error;

/// Settings could not be read or hold invalid values
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings store is unavailable this tick
    #[error("Settings unavailable: {0}")]
    Unavailable(String),

    /// A value is outside its accepted range
    #[error("Invalid setting: {0}")]
    Invalid(String),

    /// IO error while reading settings
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Create an invalid value error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// The host's save-a-copy action failed
#[derive(Debug, Error)]
#[error("Failed to save copy to {}: {reason}", path.display())]
pub struct SaveError {
    /// Destination that was attempted
    pub path: PathBuf,
    /// Host-provided reason
    pub reason: String,
}

impl SaveError {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A snapshot file name could not be allocated
#[derive(Debug, Error)]
pub enum DestinationError {
    /// Every collision suffix for this minute is taken
    #[error(
        "No free snapshot name in {} for {base_name} (tried {attempts} names)",
        directory.display()
    )]
    Exhausted {
        directory: PathBuf,
        base_name: String,
        attempts: u32,
    },
}
