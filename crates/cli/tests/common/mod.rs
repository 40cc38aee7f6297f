//! Helpers for running the `autosnap` binary in tests

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Command builder for the `autosnap` binary
pub struct AutosnapCommand {
    args: Vec<String>,
}

impl AutosnapCommand {
    /// Start a command that reads and writes settings at `config`
    pub fn new(config: &Path) -> Self {
        Self {
            args: vec!["--config".to_string(), config.display().to_string()],
        }
    }

    /// Add command arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn arg_path(mut self, path: &Path) -> Self {
        self.args.push(path.display().to_string());
        self
    }

    pub fn execute(&self) -> CommandResult {
        let start = Instant::now();
        let output = Command::new(env!("CARGO_BIN_EXE_autosnap"))
            .args(&self.args)
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to run autosnap");

        CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            duration: start.elapsed(),
        }
    }

    /// Execute and assert success
    pub fn assert_success(&self) -> CommandResult {
        let result = self.execute();
        assert!(
            result.success(),
            "Command failed (exit code: {}):\nArgs: {:?}\nStdout: {}\nStderr: {}",
            result.exit_code,
            self.args,
            result.stdout,
            result.stderr
        );
        result
    }

    /// Execute and expect failure
    pub fn assert_failure(&self) -> CommandResult {
        let result = self.execute();
        assert!(
            !result.success(),
            "Command should have failed but succeeded:\nArgs: {:?}\nStdout: {}",
            self.args,
            result.stdout
        );
        result
    }
}

/// Command execution result with timing
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    #[allow(dead_code)]
    pub duration: Duration,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn contains_stdout(&self, text: &str) -> bool {
        self.stdout.contains(text)
    }
}

/// Scratch directory outside the system temp directories
///
/// The binary refuses to autosave next to files under the system temp dirs,
/// so tests that expect a snapshot work under the cargo target dir. Returns
/// `None` when even that lives under a temp dir.
pub fn scratch_dir() -> Option<TempDir> {
    let dir = TempDir::new_in(env!("CARGO_TARGET_TMPDIR")).expect("failed to create scratch dir");
    let canonical = dir.path().canonicalize().ok()?;

    let temp_roots = [std::env::temp_dir(), PathBuf::from("/tmp"), PathBuf::from("/var/tmp")];
    let protected = temp_roots
        .iter()
        .filter_map(|root| root.canonicalize().ok())
        .any(|root| canonical.starts_with(root));

    if protected {
        eprintln!("skipping: {} is inside a temp directory", canonical.display());
        None
    } else {
        Some(dir)
    }
}

/// Snapshot files for `base` with `ext` in `dir`, sorted by name
pub fn snapshots(dir: &Path, base: &str, ext: &str) -> Vec<String> {
    let prefix = format!("{}_", base);
    let suffix = format!(".{}", ext);
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("failed to read dir")
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| name.starts_with(&prefix) && name.ends_with(&suffix))
        .collect();
    names.sort();
    names
}
