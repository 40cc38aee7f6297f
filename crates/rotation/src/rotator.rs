//! Retention enforcement for one document's snapshots

use crate::{Result, RotationError};
use autosnap_core::naming::matches_snapshot;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A snapshot file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    pub path: PathBuf,
    pub file_name: String,
    pub modified: SystemTime,
}

/// A file that could not be removed
#[derive(Debug)]
pub struct RemovalFailure {
    pub path: PathBuf,
    pub error: std::io::Error,
}

/// What a rotation pass did
#[derive(Debug, Default)]
pub struct RotationReport {
    /// Removed snapshots, oldest first
    pub deleted: Vec<PathBuf>,
    /// Snapshots that should have been removed but could not be
    pub failed: Vec<RemovalFailure>,
    /// Snapshots left in place, oldest first
    pub retained: Vec<PathBuf>,
}

impl RotationReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Deletions decided but not yet performed
#[derive(Debug, Clone, Default)]
pub struct RotationPlan {
    /// Oldest first
    pub remove: Vec<SnapshotFile>,
    /// Oldest first
    pub keep: Vec<SnapshotFile>,
}

impl RotationPlan {
    /// Delete every planned file, continuing past failures
    pub fn execute(self) -> RotationReport {
        let mut report = RotationReport {
            retained: self.keep.into_iter().map(|f| f.path).collect(),
            ..Default::default()
        };

        for file in self.remove {
            match std::fs::remove_file(&file.path) {
                Ok(()) => {
                    info!("Removed old autosave: {}", file.path.display());
                    report.deleted.push(file.path);
                }
                Err(e) => {
                    warn!("Failed to remove old autosave {}: {}", file.path.display(), e);
                    report.failed.push(RemovalFailure { path: file.path, error: e });
                }
            }
        }

        report
    }
}

/// Backup rotator for the snapshots of a single document
///
/// Only regular files directly inside `directory` whose names match
/// `{base_name}_*.{extension}` are ever considered, so unrelated files that
/// share the directory are never touched.
#[derive(Debug, Clone)]
pub struct BackupRotator {
    directory: PathBuf,
    base_name: String,
    extension: String,
    max_backup_files: usize,
    protect: Option<OsString>,
}

impl BackupRotator {
    /// Create a rotator; a retention count of 0 is treated as 1
    pub fn new(
        directory: impl Into<PathBuf>,
        base_name: impl Into<String>,
        extension: impl Into<String>,
        max_backup_files: usize,
    ) -> Self {
        Self {
            directory: directory.into(),
            base_name: base_name.into(),
            extension: extension.into(),
            max_backup_files: max_backup_files.max(1),
            protect: None,
        }
    }

    /// Never delete this file (the snapshot written this cycle)
    ///
    /// It still counts toward the retention limit.
    pub fn protect(mut self, path: &Path) -> Self {
        self.protect = path.file_name().map(|n| n.to_os_string());
        self
    }

    /// List matching snapshots, oldest first
    ///
    /// Ordered by modification time; equal mtimes fall back to file name so
    /// the order is deterministic.
    pub fn list(&self) -> Result<Vec<SnapshotFile>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(RotationError::List {
                        directory: self.directory.clone(),
                        source: e.into(),
                    });
                }
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", self.directory.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(file_name) = entry.file_name().to_str() else {
                continue;
            };
            if !matches_snapshot(file_name, &self.base_name, &self.extension) {
                continue;
            }

            let modified = match entry
                .metadata()
                .map_err(std::io::Error::from)
                .and_then(|m| m.modified())
            {
                Ok(modified) => modified,
                Err(e) => {
                    warn!("Skipping {}: no modification time ({})", entry.path().display(), e);
                    continue;
                }
            };

            files.push(SnapshotFile {
                path: entry.path().to_path_buf(),
                file_name: file_name.to_string(),
                modified,
            });
        }

        files.sort_by(|a, b| {
            a.modified
                .cmp(&b.modified)
                .then_with(|| a.file_name.cmp(&b.file_name))
        });
        Ok(files)
    }

    /// Decide which snapshots to remove without deleting anything
    pub fn plan(&self) -> Result<RotationPlan> {
        let files = self.list()?;
        let excess = files.len().saturating_sub(self.max_backup_files);

        let mut plan = RotationPlan::default();
        for file in files {
            let protected = self
                .protect
                .as_deref()
                .is_some_and(|name| name == file.file_name.as_str());

            if plan.remove.len() < excess && !protected {
                plan.remove.push(file);
            } else {
                plan.keep.push(file);
            }
        }

        debug!(
            "Rotation plan for {}_*: keep {}, remove {}",
            self.base_name,
            plan.keep.len(),
            plan.remove.len()
        );
        Ok(plan)
    }

    /// Delete the oldest snapshots until at most `max_backup_files` remain
    pub fn rotate(&self) -> Result<RotationReport> {
        Ok(self.plan()?.execute())
    }
}

/// Rotate the snapshots of `base_name` in `directory`
///
/// `protect` names the file written this cycle, which is never deleted.
pub fn rotate(
    directory: &Path,
    base_name: &str,
    extension: &str,
    max_backup_files: usize,
    protect: Option<&Path>,
) -> Result<RotationReport> {
    let mut rotator = BackupRotator::new(directory, base_name, extension, max_backup_files);
    if let Some(path) = protect {
        rotator = rotator.protect(path);
    }
    rotator.rotate()
}
