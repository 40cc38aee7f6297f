//! Autosnap CLI library
//!
//! This crate provides:
//! - A file-backed document host (`FileDocument`)
//! - The TOML settings file and its `SettingsSource` (`TomlSettings`)
//! - Tracing setup
//! - Command implementations for the `autosnap` binary

pub mod cmd;
pub mod file_host;
pub mod logging;
pub mod system_config;
pub mod util;

pub use file_host::FileDocument;
pub use system_config::{Overrides, SystemConfig, TomlSettings};
