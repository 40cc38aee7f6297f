//! Periodic autosave scheduling
//!
//! This crate provides:
//! - Host capability traits (document, settings, environment, clock)
//! - The autosave state machine (`AutosaveScheduler`)
//! - A tokio driver (`AutosaveService`)
//! - A deterministic fake timer (`ManualTimer`)

pub mod host;
pub mod scheduler;
pub mod service;
pub mod timer;

// Re-exports
pub use host::{
    Clock, DocumentHost, Environment, FixedSettings, SettingsSource, SharedSettings,
    StaticEnvironment, SystemClock, SystemEnvironment,
};
pub use scheduler::{
    ActivationId, AutosaveScheduler, ScheduleState, ScheduledTick, StopHandle, TickOutcome,
    CONFIG_RETRY_INTERVAL, DEFAULT_WARMUP,
};
pub use service::AutosaveService;
pub use timer::ManualTimer;
