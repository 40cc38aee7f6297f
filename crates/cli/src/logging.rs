//! Tracing setup for the `autosnap` binary
//!
//! Logs go to stderr so command output on stdout stays parseable. With a log
//! directory, a daily rolling file is written as well.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default filter directive for a `-v` count
///
/// `RUST_LOG` wins over this when set.
pub fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn,autosnap=info,cli_lib=info,autosnap_scheduler=info,autosnap_rotation=info",
        1 => concat!(
            "info,autosnap=debug,cli_lib=debug,autosnap_scheduler=debug,",
            "autosnap_rotation=debug,autosnap_core=debug"
        ),
        _ => "trace",
    }
}

/// Install the global subscriber
///
/// The returned guard flushes the file writer on drop and must live until the
/// program exits.
pub fn init(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbose)));

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("autosnap")
                .filename_suffix("log")
                .build(dir)
                .context("Failed to create log appender")?;
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to install tracing subscriber")?;

            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to install tracing subscriber")?;

            Ok(None)
        }
    }
}
