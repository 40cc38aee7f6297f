//! Settings file for the autosnap host
//!
//! A TOML file with an `[autosave]` table. The running scheduler re-reads it on
//! every tick, so `autosnap config set` takes effect without a restart.

use anyhow::{Context, Result};
use autosnap_core::{AutosaveConfig, ConfigError};
use autosnap_scheduler::SettingsSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub autosave: AutosaveConfig,
}

impl SystemConfig {
    /// Check every value before it is written to disk
    pub fn validate(&self) -> Result<()> {
        self.autosave.validate()?;
        Ok(())
    }
}

/// Default location: `<config dir>/autosnap/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("autosnap").join("config.toml"))
}

/// Pick the explicit path if given, otherwise the default location
pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => config_file_path().context("Could not determine config file path"),
    }
}

/// Parse settings from `path`; a missing file yields the defaults
pub fn load_from(path: &Path) -> Result<SystemConfig, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SystemConfig::default()),
        Err(e) => return Err(e.into()),
    };

    toml::from_str(&contents)
        .map_err(|e| ConfigError::unavailable(format!("{}: {}", path.display(), e)))
}

/// Load settings from the resolved path
pub fn load(explicit: Option<&Path>) -> Result<SystemConfig> {
    let path = resolve_path(explicit)?;
    load_from(&path).with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Write settings to the resolved path, creating parent directories
pub fn save(explicit: Option<&Path>, config: &SystemConfig) -> Result<()> {
    let path = resolve_path(explicit)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    let serialized = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(&path, serialized)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    Ok(())
}

/// Create the config file with defaults if it does not exist yet
///
/// Returns true if a file was created.
pub fn init_if_missing(explicit: Option<&Path>) -> Result<bool> {
    let path = resolve_path(explicit)?;
    if path.exists() {
        return Ok(false);
    }
    save(Some(&path), &SystemConfig::default())?;
    Ok(true)
}

/// Annotated example file
pub fn example_config() -> String {
    r#"# autosnap configuration

[autosave]
# Seconds between autosaves (30 - 86400). Values below 30 are raised to 30.
interval_seconds = 300.0

# Snapshots to keep per document; older ones are removed (1 - 10000).
max_backup_files = 1

# Used when the document was never saved or lives in a temp/install directory.
# Leave unset to be prompted once per session instead.
# default_save_dir = "/home/me/autosaves"
"#
    .to_string()
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub interval_seconds: Option<f64>,
    pub max_backup_files: Option<usize>,
    pub default_save_dir: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(&self, config: &mut AutosaveConfig) {
        if let Some(interval) = self.interval_seconds {
            config.interval_seconds = interval;
        }
        if let Some(max) = self.max_backup_files {
            config.max_backup_files = max;
        }
        if let Some(dir) = &self.default_save_dir {
            config.default_save_dir = Some(dir.clone());
        }
    }
}

/// Settings source backed by the TOML file, re-read on every call
#[derive(Debug, Clone)]
pub struct TomlSettings {
    path: PathBuf,
    overrides: Overrides,
}

impl TomlSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            overrides: Overrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsSource for TomlSettings {
    fn read_config(&self) -> Result<AutosaveConfig, ConfigError> {
        let mut config = load_from(&self.path)?.autosave;
        self.overrides.apply(&mut config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, SystemConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/config.toml");

        let mut config = SystemConfig::default();
        config.autosave.max_backup_files = 5;
        config.autosave.default_save_dir = Some(PathBuf::from("/srv/autosaves"));
        save(Some(&path), &config).unwrap();

        assert_eq!(load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[autosave]\nmax_backup_files = 3\n").unwrap();

        let config = load_from(&path).unwrap();
        assert_eq!(config.autosave.max_backup_files, 3);
        assert_eq!(config.autosave.interval_seconds, 300.0);
    }

    #[test]
    fn test_example_parses_and_validates() {
        let config: SystemConfig = toml::from_str(&example_config()).unwrap();
        assert_eq!(config, SystemConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_file_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[autosave\ninterval_seconds = ").unwrap();

        let settings = TomlSettings::new(&path);
        assert!(matches!(settings.read_config(), Err(ConfigError::Unavailable(_))));
    }

    #[test]
    fn test_overrides_win_and_file_is_reread() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[autosave]\ninterval_seconds = 120.0\nmax_backup_files = 2\n").unwrap();

        let settings = TomlSettings::new(&path).with_overrides(Overrides {
            max_backup_files: Some(9),
            ..Default::default()
        });
        let config = settings.read_config().unwrap();
        assert_eq!(config.interval_seconds, 120.0);
        assert_eq!(config.max_backup_files, 9);

        fs::write(&path, "[autosave]\ninterval_seconds = 600.0\n").unwrap();
        assert_eq!(settings.read_config().unwrap().interval_seconds, 600.0);
    }

    #[test]
    fn test_init_if_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        assert!(init_if_missing(Some(&path)).unwrap());
        assert!(path.exists());
        assert!(!init_if_missing(Some(&path)).unwrap());
    }
}
