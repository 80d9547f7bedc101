//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `eudai-tasks`.
#[derive(Debug, Parser)]
#[command(name = "eudai-tasks", version, about = "Run the eudai project tasks")]
pub struct Cli {
    /// Repository root (defaults to the current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Re-use existing task environments instead of recreating them.
    #[arg(short = 'r', long, global = true)]
    pub reuse_venv: bool,

    /// Fail when a command not marked external is missing from the task environment.
    #[arg(long, global = true)]
    pub error_on_external_run: bool,

    /// Replay a recorded cassette instead of touching disk and processes.
    #[arg(long, global = true, value_name = "CASSETTE")]
    pub replay: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run tasks in order; runs lint, type-check, test and build-docs when none are named.
    Run {
        /// Task names or aliases.
        tasks: Vec<String>,
        /// Positional arguments passed to every task (after `--`).
        #[arg(last = true)]
        posargs: Vec<String>,
    },
    /// List registered tasks.
    List,
}

/// CLI parser for the `eudai-backend` entry point.
#[derive(Debug, Parser)]
#[command(name = "eudai-backend", version, about = "eudai-backend.")]
pub struct BackendCli {
    /// Env file to read settings from.
    #[arg(long, value_name = "FILE", default_value = crate::settings::DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,
}
