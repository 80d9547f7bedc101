//! Command dispatch and handlers.

pub mod list;
pub mod run;

use std::path::PathBuf;

use crate::cli::{Cli, Command};
use crate::config::TasksConfig;
use crate::context::ServiceContext;

/// Dispatch a parsed command line to its handler.
///
/// When `EUDAI_TASKS_RECORD` is set to a directory path, every port
/// interaction is recorded to a cassette in that directory. `--replay`
/// serves all ports from a cassette instead.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the selected
/// command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()
            .map_err(|e| format!("Failed to determine current directory: {e}"))?,
    };
    let mut config = TasksConfig::from_env(&root)?;
    config.reuse_venv |= cli.reuse_venv;
    config.error_on_external_run |= cli.error_on_external_run;

    let (ctx, session) = if let Some(cassette) = &cli.replay {
        (ServiceContext::replaying(cassette)?, None)
    } else if let Some(dir) = config.record_dir.clone() {
        let (ctx, session) = ServiceContext::recording_at(dir)?;
        tracing::debug!(cassette = %session.path().display(), "recording port interactions");
        (ctx, Some(session))
    } else {
        (ServiceContext::live(), None)
    };

    let result = dispatch_with_context(&cli.command, &ctx, &config);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        return settle_recording(result, session.finish());
    }

    result
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &TasksConfig,
) -> Result<(), String> {
    match command {
        Command::Run { tasks, posargs } => run::run(ctx, config, tasks, posargs),
        Command::List => list::run(),
    }
}

/// Combines a command result with the outcome of writing its cassette.
///
/// The command's own error always wins; a cassette that could not be written
/// only fails a run that otherwise succeeded.
fn settle_recording(
    result: Result<(), String>,
    recording: Result<PathBuf, String>,
) -> Result<(), String> {
    match (result, recording) {
        (result, Ok(path)) => {
            tracing::info!("Recording saved to: {}", path.display());
            result
        }
        (Err(err), Err(recording_err)) => {
            tracing::error!("{recording_err}");
            Err(err)
        }
        (Ok(()), Err(recording_err)) => Err(recording_err),
    }
}
