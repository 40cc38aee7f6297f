//! Core types for autosnap
//!
//! This crate provides:
//! - Autosave settings (`AutosaveConfig`) with interval/retention floors
//! - Forbidden location detection (temp dirs, install dir)
//! - Destination resolution (`PathPolicy`)
//! - Timestamped snapshot naming
//!
//! Nothing in here schedules work; see `autosnap-scheduler`.

pub mod config;
pub mod document;
pub mod error;
pub mod forbidden;
pub mod naming;
pub mod policy;

// Re-exports
pub use config::AutosaveConfig;
pub use document::{DocumentLocation, SaveDestination, SaveTarget};
pub use error::{ConfigError, DestinationError, SaveError};
pub use forbidden::ForbiddenPathSet;
pub use naming::{snapshot_prefix, snapshot_suffix, timestamp_component, UNTITLED_BASE_NAME};
pub use policy::{DocumentPath, PathPolicy, PolicyInput, PromptState, Resolution, SkipReason};
