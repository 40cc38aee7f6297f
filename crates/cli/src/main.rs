//! Autosnap CLI - autosnap command

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli_lib::cmd;
use cli_lib::cmd::run::RunOptions;
use cli_lib::{logging, Overrides};
use std::path::PathBuf;

/// Autosnap - Periodic timestamped autosaves with backup rotation
#[derive(Parser)]
#[command(name = "autosnap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (default: <config dir>/autosnap/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also write logs to a daily file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Autosave a file periodically until Ctrl-C
    Run {
        /// File to autosave
        source: PathBuf,
        /// Treat the file as never saved
        #[arg(long)]
        untitled: bool,
        /// Run a single cycle now and exit
        #[arg(long)]
        once: bool,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Show where the next autosave would be written
    Where {
        /// File to check
        source: PathBuf,
        /// Treat the file as never saved
        #[arg(long)]
        untitled: bool,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Remove old snapshots, keeping the newest ones
    Rotate {
        /// Directory holding the snapshots
        directory: PathBuf,
        /// Document base name (snapshots are <BASE>_<timestamp>.<EXT>)
        base_name: String,
        /// Snapshot extension
        #[arg(long)]
        ext: String,
        /// Number of snapshots to keep
        #[arg(long, default_value = "1")]
        keep: usize,
        /// Only show what would be removed
        #[arg(long)]
        dry_run: bool,
    },
    /// View and edit settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Settings given on the command line; they win over the settings file
#[derive(clap::Args)]
struct OverrideArgs {
    /// Seconds between autosaves
    #[arg(long)]
    interval: Option<f64>,
    /// Snapshots to keep
    #[arg(long)]
    max_backups: Option<usize>,
    /// Directory for unsaved or protected documents
    #[arg(long)]
    default_dir: Option<PathBuf>,
}

impl From<OverrideArgs> for Overrides {
    fn from(args: OverrideArgs) -> Self {
        Overrides {
            interval_seconds: args.interval,
            max_backup_files: args.max_backups,
            default_save_dir: args.default_dir,
        }
    }
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all values
    List,
    /// Print one value
    Get {
        /// Key, e.g. autosave.interval_seconds
        key: String,
    },
    /// Change one value
    Set {
        /// Key, e.g. autosave.max_backup_files
        key: String,
        /// New value ("" unsets autosave.default_save_dir)
        value: String,
    },
    /// Show the settings file path
    Path {
        /// Create the file with defaults if missing
        #[arg(long)]
        create: bool,
    },
    /// Print an annotated example file
    Example,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Flushes the log file on exit
    let _guard = logging::init(cli.verbose, cli.log_dir.as_deref())?;

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Run { source, untitled, once, overrides } => {
            cmd::run::run(RunOptions {
                source,
                untitled,
                once,
                config_path: cli.config.clone(),
                overrides: overrides.into(),
            })
            .await
        }
        Commands::Where { source, untitled, overrides } => {
            cmd::locate::run(&source, untitled, config, overrides.into()).await
        }
        Commands::Rotate { directory, base_name, ext, keep, dry_run } => {
            cmd::rotate::run(&directory, &base_name, &ext, keep, dry_run).await
        }
        Commands::Config(command) => match command {
            ConfigCommands::List => cmd::config::run_list(config).await,
            ConfigCommands::Get { key } => cmd::config::run_get(config, &key).await,
            ConfigCommands::Set { key, value } => cmd::config::run_set(config, &key, &value).await,
            ConfigCommands::Path { create } => cmd::config::run_path(config, create).await,
            ConfigCommands::Example => cmd::config::run_example().await,
        },
    }
}
