//! Tokio driver for the autosave scheduler
//!
//! Each activation runs one background task that sleeps for the requested
//! delay, runs the blocking tick on the blocking pool, and exits when the
//! scheduler ends the chain. The scheduler sits behind a mutex so start/stop
//! calls never interleave with a running tick.

use crate::host::DocumentHost;
use crate::scheduler::{AutosaveScheduler, ScheduledTick, CONFIG_RETRY_INTERVAL};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Runs an [`AutosaveScheduler`] on the current tokio runtime
pub struct AutosaveService<H> {
    scheduler: Arc<Mutex<AutosaveScheduler<H>>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<H> AutosaveService<H>
where
    H: DocumentHost + Send + 'static,
{
    pub fn new(scheduler: AutosaveScheduler<H>) -> Self {
        Self {
            scheduler: Arc::new(Mutex::new(scheduler)),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Start autosaving; returns false if already running
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> bool {
        let first = self.scheduler.lock().start();
        match first {
            Some(tick) => {
                let handle = tokio::spawn(drive(Arc::clone(&self.scheduler), tick));
                let mut tasks = self.tasks.lock();
                tasks.retain(|task| !task.is_finished());
                tasks.push(handle);
                true
            }
            None => false,
        }
    }

    /// Stop autosaving at the next tick boundary
    ///
    /// Waits for a tick that is currently running to finish.
    pub fn stop(&self) {
        self.scheduler.lock().stop();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.lock().is_running()
    }

    /// Run `f` with exclusive access to the scheduler
    pub fn with_scheduler<R>(&self, f: impl FnOnce(&mut AutosaveScheduler<H>) -> R) -> R {
        f(&mut self.scheduler.lock())
    }

    /// Stop and wait for background tasks to go away
    ///
    /// Tasks idling in a sleep are cancelled rather than waited out.
    pub async fn shutdown(self) {
        self.stop();

        let tasks = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            task.abort();
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    warn!("Autosave task failed: {}", e);
                }
            }
        }

        info!("Autosave service shut down");
    }
}

async fn drive<H>(scheduler: Arc<Mutex<AutosaveScheduler<H>>>, first: ScheduledTick)
where
    H: DocumentHost + Send + 'static,
{
    let mut next = first;

    loop {
        tokio::time::sleep(next.delay).await;

        let activation = next.activation;
        let scheduler = Arc::clone(&scheduler);
        let result = tokio::task::spawn_blocking(move || scheduler.lock().tick(activation)).await;

        match result {
            Ok(Some(tick)) => next = tick,
            Ok(None) => {
                debug!("Autosave schedule ended (activation {})", activation.as_u64());
                break;
            }
            Err(e) => {
                // Host code panicked mid-tick; keep the schedule alive
                warn!("Autosave tick panicked: {}", e);
                next = ScheduledTick {
                    activation,
                    delay: CONFIG_RETRY_INTERVAL,
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FixedSettings, StaticEnvironment};
    use autosnap_core::{AutosaveConfig, SaveError};
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use tempfile::TempDir;

    struct FileHost {
        path: PathBuf,
        saves: Vec<PathBuf>,
    }

    impl DocumentHost for FileHost {
        fn current_document_path(&self) -> Option<PathBuf> {
            Some(self.path.clone())
        }

        fn file_extension(&self) -> String {
            "txt".to_string()
        }

        fn save_copy(&mut self, path: &Path) -> Result<(), SaveError> {
            std::fs::copy(&self.path, path).map_err(|e| SaveError::new(path, e.to_string()))?;
            self.saves.push(path.to_path_buf());
            Ok(())
        }

        fn prompt_user_to_save(&mut self) {}
    }

    fn service(temp_dir: &TempDir) -> AutosaveService<FileHost> {
        let doc = temp_dir.path().join("notes.txt");
        std::fs::write(&doc, b"draft").unwrap();

        let host = FileHost {
            path: doc,
            saves: Vec::new(),
        };
        let scheduler = AutosaveScheduler::new(host, FixedSettings(AutosaveConfig::default()))
            .with_environment(StaticEnvironment::default())
            .with_warmup(Duration::from_millis(20));
        AutosaveService::new(scheduler)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_first_tick_runs_after_warmup() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);

        assert!(service.start());
        assert!(!service.start());

        tokio::time::sleep(Duration::from_millis(500)).await;

        let (ticks, saves) = service.with_scheduler(|s| (s.ticks_run(), s.host().saves.clone()));
        assert_eq!(ticks, 1);
        assert_eq!(saves.len(), 1);
        assert!(saves[0].exists());

        service.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_stop_before_warmup_prevents_ticks() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir);

        service.start();
        service.stop();
        assert!(!service.is_running());

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(service.with_scheduler(|s| s.ticks_run()), 0);
        service.shutdown().await;
    }
}
