//! Rotation error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a rotation pass
///
/// Failures on individual files never abort; they are reported in
/// [`crate::RotationReport::failed`].
#[derive(Debug, Error)]
pub enum RotationError {
    /// The snapshot directory could not be listed
    #[error("Failed to list snapshot directory {}: {source}", directory.display())]
    List {
        directory: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
