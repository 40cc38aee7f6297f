//! Capabilities the host application provides to the scheduler

use autosnap_core::{AutosaveConfig, ConfigError, SaveError};
use chrono::{Local, NaiveDateTime};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The host's live document
pub trait DocumentHost {
    /// Path the document is saved at, `None` if it was never saved
    fn current_document_path(&self) -> Option<PathBuf>;

    /// Extension (without dot) of the host's save format
    fn file_extension(&self) -> String;

    /// Write the current document state to `path`
    ///
    /// Must not change which file the document is associated with, nor mark
    /// it clean. Called from the scheduling context, without any UI state.
    fn save_copy(&mut self, path: &Path) -> Result<(), SaveError>;

    /// Ask the user to save the document somewhere (fire-and-forget)
    fn prompt_user_to_save(&mut self);
}

/// Settings store
pub trait SettingsSource {
    /// Current settings; called once per tick
    fn read_config(&self) -> Result<AutosaveConfig, ConfigError>;
}

/// Unchanging settings
#[derive(Debug, Clone, Default)]
pub struct FixedSettings(pub AutosaveConfig);

impl SettingsSource for FixedSettings {
    fn read_config(&self) -> Result<AutosaveConfig, ConfigError> {
        Ok(self.0.clone())
    }
}

/// Settings shared with code that may change them between ticks
#[derive(Debug, Clone, Default)]
pub struct SharedSettings(Arc<RwLock<AutosaveConfig>>);

impl SharedSettings {
    pub fn new(config: AutosaveConfig) -> Self {
        Self(Arc::new(RwLock::new(config)))
    }

    /// Replace the settings; picked up on the next tick
    pub fn set(&self, config: AutosaveConfig) {
        *self.0.write() = config;
    }

    pub fn update(&self, f: impl FnOnce(&mut AutosaveConfig)) {
        f(&mut self.0.write());
    }
}

impl SettingsSource for SharedSettings {
    fn read_config(&self) -> Result<AutosaveConfig, ConfigError> {
        Ok(self.0.read().clone())
    }
}

/// Locations where autosaves must never be written
pub trait Environment {
    /// Directory the host application is installed in
    fn install_directory(&self) -> Option<PathBuf>;

    /// System temporary directories
    fn system_temp_directories(&self) -> Vec<PathBuf>;

    /// Every forbidden directory, temp dirs first
    fn forbidden_directories(&self) -> Vec<PathBuf> {
        let mut dirs = self.system_temp_directories();
        dirs.extend(self.install_directory());
        dirs
    }
}

/// Environment of the running process
///
/// Temp directories come from `std::env::temp_dir`, the `TEMP`/`TMP`/`TMPDIR`
/// variables and the usual Unix locations; the install directory is the one
/// holding the current executable unless overridden.
#[derive(Debug, Clone, Default)]
pub struct SystemEnvironment {
    install_dir: Option<PathBuf>,
}

impl SystemEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `dir` as the install directory instead of the executable's
    pub fn with_install_directory(dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: Some(dir.into()),
        }
    }
}

impl Environment for SystemEnvironment {
    fn install_directory(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.install_dir {
            return Some(dir.clone());
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
    }

    fn system_temp_directories(&self) -> Vec<PathBuf> {
        let mut dirs = vec![std::env::temp_dir()];

        for var in ["TEMP", "TMP", "TMPDIR"] {
            if let Some(value) = std::env::var_os(var) {
                if !value.is_empty() {
                    dirs.push(PathBuf::from(value));
                }
            }
        }

        if cfg!(unix) {
            dirs.push(PathBuf::from("/tmp"));
            dirs.push(PathBuf::from("/var/tmp"));
        }

        dirs
    }
}

/// Explicit forbidden directories (tests, embedded hosts)
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    pub install_dir: Option<PathBuf>,
    pub temp_dirs: Vec<PathBuf>,
}

impl Environment for StaticEnvironment {
    fn install_directory(&self) -> Option<PathBuf> {
        self.install_dir.clone()
    }

    fn system_temp_directories(&self) -> Vec<PathBuf> {
        self.temp_dirs.clone()
    }
}

/// Wall clock used for snapshot timestamps
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local time, 24-hour
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_settings_visible_on_next_read() {
        let settings = SharedSettings::new(AutosaveConfig::default());
        let writer = settings.clone();

        writer.update(|c| c.max_backup_files = 4);
        assert_eq!(settings.read_config().unwrap().max_backup_files, 4);

        writer.set(AutosaveConfig {
            interval_seconds: 60.0,
            ..Default::default()
        });
        let config = settings.read_config().unwrap();
        assert_eq!(config.interval_seconds, 60.0);
        assert_eq!(config.max_backup_files, 1);
    }

    #[test]
    fn test_system_environment_includes_temp_dir() {
        let env = SystemEnvironment::with_install_directory("/opt/host");
        let dirs = env.forbidden_directories();

        assert!(dirs.contains(&std::env::temp_dir()));
        assert_eq!(dirs.last(), Some(&PathBuf::from("/opt/host")));
    }
}
