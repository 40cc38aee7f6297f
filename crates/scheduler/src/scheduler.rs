//! Autosave scheduler state machine
//!
//! The scheduler never sleeps or spawns anything itself. `start()` and
//! `tick()` hand back a [`ScheduledTick`] ("run me again after this delay")
//! that the host's event loop, the tokio [`crate::AutosaveService`], or a
//! [`crate::ManualTimer`] carries out. Returning `None` ends the chain.

use crate::host::{
    Clock, DocumentHost, Environment, SettingsSource, SystemClock, SystemEnvironment,
};
use autosnap_core::{
    DestinationError, DocumentLocation, ForbiddenPathSet, PathPolicy, PromptState, Resolution,
    SaveDestination, SaveError, SaveTarget, SkipReason,
};
use autosnap_rotation::{BackupRotator, RotationError, RotationReport};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Delay before the first tick of an activation
pub const DEFAULT_WARMUP: Duration = Duration::from_secs(1);

/// Delay used when the settings cannot be read
pub const CONFIG_RETRY_INTERVAL: Duration = Duration::from_secs(300);

/// Scheduler lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleState {
    Stopped,
    Running,
}

/// Identifies one start→stop lifetime of a scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActivationId(u64);

impl ActivationId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Request to run [`AutosaveScheduler::tick`] for `activation` after `delay`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTick {
    pub activation: ActivationId,
    pub delay: Duration,
}

/// What a tick did
#[derive(Debug)]
pub enum TickOutcome {
    /// Snapshot written and old ones rotated
    Saved { path: PathBuf, rotation: RotationReport },
    /// Snapshot written but the directory could not be listed for rotation
    RotationFailed { path: PathBuf, error: RotationError },
    /// The user was asked to save; nothing written
    Prompted,
    /// Nothing to do this cycle
    Skipped(SkipReason),
    /// Settings could not be read
    ConfigUnavailable(String),
    /// No free snapshot name
    DestinationFailed(DestinationError),
    /// The host's save action failed; rotation skipped
    SaveFailed(SaveError),
}

/// Stops an activation from anywhere, including from inside a tick
///
/// Takes effect at the next tick boundary; a tick already running completes.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Periodic autosave driver for one document host
pub struct AutosaveScheduler<H> {
    host: H,
    settings: Box<dyn SettingsSource + Send>,
    environment: Box<dyn Environment + Send>,
    clock: Box<dyn Clock + Send>,
    warmup: Duration,

    state: ScheduleState,
    activation: ActivationId,
    stop_requested: Arc<AtomicBool>,
    prompt: PromptState,

    ticks_run: u64,
    last_outcome: Option<TickOutcome>,
}

impl<H: DocumentHost> AutosaveScheduler<H> {
    /// Create a stopped scheduler using the process environment and local time
    pub fn new(host: H, settings: impl SettingsSource + Send + 'static) -> Self {
        Self {
            host,
            settings: Box::new(settings),
            environment: Box::new(SystemEnvironment::new()),
            clock: Box::new(SystemClock),
            warmup: DEFAULT_WARMUP,
            state: ScheduleState::Stopped,
            activation: ActivationId(0),
            stop_requested: Arc::new(AtomicBool::new(false)),
            prompt: PromptState::new(),
            ticks_run: 0,
            last_outcome: None,
        }
    }

    pub fn with_environment(mut self, environment: impl Environment + Send + 'static) -> Self {
        self.environment = Box::new(environment);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Delay before the first tick of each activation
    pub fn with_warmup(mut self, warmup: Duration) -> Self {
        self.warmup = warmup;
        self
    }

    /// Begin an activation
    ///
    /// Returns the first tick to schedule, or `None` if already running.
    /// A new activation forgets any earlier prompt.
    pub fn start(&mut self) -> Option<ScheduledTick> {
        if self.is_running() {
            debug!("Autosave already running (activation {})", self.activation.0);
            return None;
        }

        self.activation = ActivationId(self.activation.0 + 1);
        self.state = ScheduleState::Running;
        self.stop_requested = Arc::new(AtomicBool::new(false));
        self.prompt.reset();

        info!(
            "Autosave started (activation {}, first tick in {:?})",
            self.activation.0, self.warmup
        );

        Some(ScheduledTick {
            activation: self.activation,
            delay: self.warmup,
        })
    }

    /// Document-loaded hook; same as [`Self::start`]
    pub fn on_document_loaded(&mut self) -> Option<ScheduledTick> {
        self.start()
    }

    /// End the activation at the next tick boundary
    pub fn stop(&mut self) {
        if self.state == ScheduleState::Running {
            info!("Autosave stopped (activation {})", self.activation.0);
        }
        self.state = ScheduleState::Stopped;
    }

    /// Handle that stops the current activation without `&mut` access
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.stop_requested))
    }

    /// Running, and no stop has been requested through a [`StopHandle`]
    pub fn is_running(&self) -> bool {
        self.state == ScheduleState::Running && !self.stop_requested.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> ScheduleState {
        if self.is_running() {
            ScheduleState::Running
        } else {
            ScheduleState::Stopped
        }
    }

    pub fn activation(&self) -> ActivationId {
        self.activation
    }

    pub fn prompt_state(&self) -> PromptState {
        self.prompt
    }

    /// Ticks that ran a save cycle, across all activations
    pub fn ticks_run(&self) -> u64 {
        self.ticks_run
    }

    pub fn last_outcome(&self) -> Option<&TickOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Run one save cycle
    ///
    /// Returns the next tick, or `None` once stopped or when `activation`
    /// belongs to an earlier start→stop lifetime. Failures inside the cycle
    /// are logged and never end the chain.
    pub fn tick(&mut self, activation: ActivationId) -> Option<ScheduledTick> {
        debug!("Autosave timer triggered (activation {})", activation.0);

        if activation != self.activation {
            debug!("Dropping tick from stale activation {}", activation.0);
            return None;
        }
        if !self.is_running() {
            self.state = ScheduleState::Stopped;
            debug!("Autosave not running; ending schedule");
            return None;
        }

        self.ticks_run += 1;
        let (outcome, next_delay) = self.run_cycle();
        self.last_outcome = Some(outcome);

        if self.is_running() {
            Some(ScheduledTick {
                activation,
                delay: next_delay,
            })
        } else {
            self.state = ScheduleState::Stopped;
            debug!("Autosave stopped during tick; not rescheduling");
            None
        }
    }

    fn run_cycle(&mut self) -> (TickOutcome, Duration) {
        let config = match self.settings.read_config() {
            Ok(config) => config,
            Err(e) => {
                warn!("Could not read autosave settings: {}", e);
                return (TickOutcome::ConfigUnavailable(e.to_string()), CONFIG_RETRY_INTERVAL);
            }
        };
        let interval = config.effective_interval();

        let forbidden = ForbiddenPathSet::resolve(self.environment.forbidden_directories());
        let document = DocumentLocation {
            current_path: self.host.current_document_path(),
        };

        let resolution = PathPolicy::resolve_for(&document, &config, &forbidden, &mut self.prompt);
        let outcome = match resolution {
            Resolution::Prompt => {
                info!("No save location for unsaved document; prompting user");
                self.host.prompt_user_to_save();
                TickOutcome::Prompted
            }
            Resolution::Skip(reason) => {
                debug!("Skipping autosave: {:?}", reason);
                TickOutcome::Skipped(reason)
            }
            Resolution::Target(target) => {
                self.save_and_rotate(&target, config.effective_max_backups())
            }
        };

        (outcome, interval)
    }

    fn save_and_rotate(&mut self, target: &SaveTarget, max_backup_files: usize) -> TickOutcome {
        let extension = self.host.file_extension();

        let destination = match SaveDestination::allocate(target, &extension, self.clock.now()) {
            Ok(destination) => destination,
            Err(e) => {
                warn!("Autosave failed: {}", e);
                return TickOutcome::DestinationFailed(e);
            }
        };
        let path = destination.new_file_path;

        if let Err(e) = self.host.save_copy(&path) {
            warn!("Autosave failed: {}", e);
            return TickOutcome::SaveFailed(e);
        }
        info!("Autosaved to: {}", path.display());

        let rotator = BackupRotator::new(
            &destination.directory,
            &destination.base_name,
            &extension,
            max_backup_files,
        )
        .protect(&path);

        match rotator.rotate() {
            Ok(rotation) => TickOutcome::Saved { path, rotation },
            Err(error) => {
                warn!("Backup management error: {}", error);
                TickOutcome::RotationFailed { path, error }
            }
        }
    }
}
