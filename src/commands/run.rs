//! `eudai-tasks run` command.

use crate::config::TasksConfig;
use crate::context::ServiceContext;
use crate::tasks::{self, TaskOutcome};

/// Execute the `run` command: the named tasks, or the defaults when none are named.
///
/// # Errors
///
/// Returns the first task failure as a message naming the task and the
/// failing command.
pub fn run(
    ctx: &ServiceContext,
    config: &TasksConfig,
    names: &[String],
    posargs: &[String],
) -> Result<(), String> {
    let reports = tasks::run_tasks(ctx, config, names, posargs).map_err(|e| e.to_string())?;
    for report in &reports {
        match &report.outcome {
            TaskOutcome::Succeeded => println!("* {}: success", report.task),
            TaskOutcome::Skipped { reason } => println!("* {}: skipped ({reason})", report.task),
        }
    }
    Ok(())
}
