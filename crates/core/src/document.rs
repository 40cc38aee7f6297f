//! Document location and snapshot destinations

use crate::error::DestinationError;
use crate::naming::snapshot_file_name;
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Where the live document currently lives on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentLocation {
    /// `None` for a new document that was never saved
    pub current_path: Option<PathBuf>,
}

impl DocumentLocation {
    pub fn saved(path: impl Into<PathBuf>) -> Self {
        Self {
            current_path: Some(path.into()),
        }
    }

    pub fn unsaved() -> Self {
        Self { current_path: None }
    }
}

/// Directory and base name chosen by the path policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTarget {
    pub directory: PathBuf,
    /// Snapshot prefix, no extension
    pub base_name: String,
}

/// Fully named snapshot file for one save cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDestination {
    pub directory: PathBuf,
    pub base_name: String,
    /// `directory / "{base_name}_{timestamp}.{ext}"`
    pub new_file_path: PathBuf,
}

impl SaveDestination {
    /// Highest collision counter tried within one minute
    pub const MAX_ATTEMPTS: u32 = 99;

    /// Name a snapshot for `target` at `at` without checking the filesystem
    pub fn new(target: &SaveTarget, extension: &str, at: NaiveDateTime) -> Self {
        let file_name = snapshot_file_name(&target.base_name, extension, at, 1);
        Self {
            directory: target.directory.clone(),
            base_name: target.base_name.clone(),
            new_file_path: target.directory.join(file_name),
        }
    }

    /// Name a snapshot that does not collide with an existing file
    ///
    /// Two saves inside the same minute get `_2`, `_3`, ... appended to the
    /// timestamp instead of overwriting the earlier snapshot.
    pub fn allocate(
        target: &SaveTarget,
        extension: &str,
        at: NaiveDateTime,
    ) -> Result<Self, DestinationError> {
        for attempt in 1..=Self::MAX_ATTEMPTS {
            let file_name = snapshot_file_name(&target.base_name, extension, at, attempt);
            let candidate = target.directory.join(file_name);

            // symlink_metadata so a dangling link still counts as taken
            if std::fs::symlink_metadata(&candidate).is_err() {
                return Ok(Self {
                    directory: target.directory.clone(),
                    base_name: target.base_name.clone(),
                    new_file_path: candidate,
                });
            }
        }

        Err(DestinationError::Exhausted {
            directory: target.directory.clone(),
            base_name: target.base_name.clone(),
            attempts: Self::MAX_ATTEMPTS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_new_joins_directory() {
        let target = SaveTarget {
            directory: PathBuf::from("/docs"),
            base_name: "project".to_string(),
        };
        let dest = SaveDestination::new(&target, "ext", noon());
        assert_eq!(dest.new_file_path, PathBuf::from("/docs/project_01_12_2025_12-00.ext"));
        assert_eq!(dest.base_name, "project");
    }

    #[test]
    fn test_allocate_suffixes_on_collision() {
        let temp_dir = TempDir::new().unwrap();
        let target = SaveTarget {
            directory: temp_dir.path().to_path_buf(),
            base_name: "project".to_string(),
        };

        let first = SaveDestination::allocate(&target, "ext", noon()).unwrap();
        assert!(first.new_file_path.ends_with("project_01_12_2025_12-00.ext"));
        fs::write(&first.new_file_path, b"one").unwrap();

        let second = SaveDestination::allocate(&target, "ext", noon()).unwrap();
        assert!(second.new_file_path.ends_with("project_01_12_2025_12-00_2.ext"));
        fs::write(&second.new_file_path, b"two").unwrap();

        let third = SaveDestination::allocate(&target, "ext", noon()).unwrap();
        assert!(third.new_file_path.ends_with("project_01_12_2025_12-00_3.ext"));

        // Earlier snapshot untouched
        assert_eq!(fs::read(&first.new_file_path).unwrap(), b"one");
    }
}
