//! Backup rotation for autosnap snapshots
//!
//! This crate provides:
//! - Snapshot enumeration for one document (`{base}_*.{ext}`, depth 1)
//! - Oldest-first ordering (mtime, then file name)
//! - Retention enforcement with per-file failure tolerance

pub mod error;
pub mod rotator;

// Re-exports
pub use error::RotationError;
pub use rotator::{
    rotate, BackupRotator, RemovalFailure, RotationPlan, RotationReport, SnapshotFile,
};

/// Result type for rotation operations
pub type Result<T> = std::result::Result<T, RotationError>;
