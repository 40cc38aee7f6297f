//! Autosave settings

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Autosave settings snapshot
///
/// Owned by the host's settings store. The scheduler reads a fresh copy on
/// every tick, so a value changed between ticks takes effect on the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Seconds between autosaves (floor: 30)
    pub interval_seconds: f64,
    /// Number of snapshots to keep per document (floor: 1)
    pub max_backup_files: usize,
    /// Where to write when the document is unsaved or in a forbidden location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_save_dir: Option<PathBuf>,
}

impl AutosaveConfig {
    /// Lowest interval a config may request
    pub const MIN_INTERVAL_SECS: f64 = 30.0;
    /// Interval used when no config is set
    pub const DEFAULT_INTERVAL_SECS: f64 = 300.0;
    /// Safety bound on the interval (one day)
    ///
    /// Keeps `Duration::from_secs_f64` away from values it cannot represent;
    /// larger requests wait one day.
    pub const MAX_INTERVAL_SECS: f64 = 86_400.0;
    /// Lowest retention count
    pub const MIN_BACKUP_FILES: usize = 1;
    /// Highest accepted retention count
    pub const MAX_BACKUP_FILES: usize = 10_000;

    /// Interval the scheduler actually waits between ticks
    ///
    /// Values below the floor (and NaN) are clamped to
    /// [`Self::MIN_INTERVAL_SECS`]; infinities collapse to the upper bound.
    pub fn effective_interval(&self) -> Duration {
        let secs = self.interval_seconds;
        let secs = if secs.is_nan() {
            Self::MIN_INTERVAL_SECS
        } else {
            secs.clamp(Self::MIN_INTERVAL_SECS, Self::MAX_INTERVAL_SECS)
        };
        Duration::from_secs_f64(secs)
    }

    /// Retention count with the floor applied
    pub fn effective_max_backups(&self) -> usize {
        self.max_backup_files.max(Self::MIN_BACKUP_FILES)
    }

    /// The configured default directory, if it is set and non-empty
    pub fn default_dir(&self) -> Option<&Path> {
        self.default_save_dir
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Reject values outside the accepted ranges
    ///
    /// Used by settings writers; the scheduler never fails on a bad value and
    /// clamps instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.interval_seconds.is_finite()
            || self.interval_seconds < Self::MIN_INTERVAL_SECS
            || self.interval_seconds > Self::MAX_INTERVAL_SECS
        {
            return Err(ConfigError::invalid(format!(
                "interval_seconds must be between {} and {} (got {})",
                Self::MIN_INTERVAL_SECS,
                Self::MAX_INTERVAL_SECS,
                self.interval_seconds
            )));
        }

        if self.max_backup_files < Self::MIN_BACKUP_FILES
            || self.max_backup_files > Self::MAX_BACKUP_FILES
        {
            return Err(ConfigError::invalid(format!(
                "max_backup_files must be between {} and {} (got {})",
                Self::MIN_BACKUP_FILES,
                Self::MAX_BACKUP_FILES,
                self.max_backup_files
            )));
        }

        if let Some(dir) = self.default_dir() {
            if !dir.is_absolute() {
                return Err(ConfigError::invalid(format!(
                    "default_save_dir must be an absolute path (got {})",
                    dir.display()
                )));
            }
        }

        Ok(())
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            interval_seconds: Self::DEFAULT_INTERVAL_SECS,
            max_backup_files: 1,
            default_save_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AutosaveConfig::default();
        assert_eq!(config.effective_interval(), Duration::from_secs(300));
        assert_eq!(config.effective_max_backups(), 1);
        assert!(config.default_dir().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_interval_below_floor_is_clamped() {
        for secs in [0.0, 1.0, 29.999, -5.0, f64::NAN, f64::NEG_INFINITY] {
            let config = AutosaveConfig {
                interval_seconds: secs,
                ..Default::default()
            };
            assert_eq!(
                config.effective_interval(),
                Duration::from_secs(30),
                "interval {} should clamp to the floor",
                secs
            );
        }
    }

    #[test]
    fn test_huge_interval_hits_safety_bound() {
        for secs in [86_400.5, 1e300, f64::INFINITY] {
            let config = AutosaveConfig {
                interval_seconds: secs,
                ..Default::default()
            };
            assert_eq!(config.effective_interval(), Duration::from_secs(86_400));
        }
    }

    #[test]
    fn test_interval_above_floor_is_kept() {
        let config = AutosaveConfig {
            interval_seconds: 45.5,
            ..Default::default()
        };
        assert_eq!(config.effective_interval(), Duration::from_secs_f64(45.5));
    }

    #[test]
    fn test_validate_rejects_low_interval() {
        let config = AutosaveConfig {
            interval_seconds: 10.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_backups_clamped_and_rejected() {
        let config = AutosaveConfig {
            max_backup_files: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_max_backups(), 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_relative_default_dir_rejected() {
        let config = AutosaveConfig {
            default_save_dir: Some(PathBuf::from("relative/dir")),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_default_dir_means_unset() {
        let config = AutosaveConfig {
            default_save_dir: Some(PathBuf::new()),
            ..Default::default()
        };
        assert!(config.default_dir().is_none());
        assert!(config.validate().is_ok());
    }
}
