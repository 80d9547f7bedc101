//! Session orchestrator: registered tasks and how they run.
//!
//! A task invocation goes through three phases:
//!
//! 1. the task's definition names the paths it depends on, and a [`Probe`]
//!    records whether each exists;
//! 2. [`plan`] checks preconditions against that record and produces the
//!    ordered steps (pure, no side effects);
//! 3. a fresh [`Session`] executes the steps, stopping at the first failure.

pub mod error;
pub mod layout;
pub mod plan;
pub mod registry;
pub mod requirement;
pub mod session;

pub use error::{TaskError, TaskFailure};
pub use layout::ProjectLayout;
pub use plan::{plan, CommandSpec, Plan, Probe, Step};
pub use registry::{TaskDefinition, TaskKind};
pub use requirement::Requirement;
pub use session::Session;

use tracing::info;

use crate::config::TasksConfig;
use crate::context::ServiceContext;

/// How a task ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Every command exited with status zero.
    Succeeded,
    /// The task decided there was nothing to do.
    Skipped {
        /// Why the task skipped.
        reason: String,
    },
}

/// Result of one task within a multi-task run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    /// Task that ran.
    pub task: TaskKind,
    /// How it ended.
    pub outcome: TaskOutcome,
}

/// Runs one task by name or alias.
///
/// # Errors
///
/// Returns [`TaskError::UnknownTask`] for unregistered names,
/// [`TaskError::MissingDirectory`] when a precondition fails (before any
/// side effect), or the error of the first failing command.
pub fn run_task(
    ctx: &ServiceContext,
    config: &TasksConfig,
    name: &str,
    posargs: &[String],
) -> Result<TaskOutcome, TaskError> {
    let kind = TaskKind::lookup(name)?;
    run_kind(ctx, config, kind, posargs)
}

/// Runs an already resolved task.
///
/// # Errors
///
/// See [`run_task`].
pub fn run_kind(
    ctx: &ServiceContext,
    config: &TasksConfig,
    kind: TaskKind,
    posargs: &[String],
) -> Result<TaskOutcome, TaskError> {
    let layout = ProjectLayout::new(&config.root);
    let definition = kind.definition(&layout);
    let probe = Probe::take(ctx.fs.as_ref(), &definition.probed_paths());
    let plan = plan(&definition, &probe, posargs)?;

    info!(task = %kind, "Running task {kind}");
    let outcome = Session::new(ctx, config, kind).execute(&plan)?;
    match &outcome {
        TaskOutcome::Succeeded => info!(task = %kind, "Task {kind} was successful"),
        TaskOutcome::Skipped { .. } => info!(task = %kind, "Task {kind} was skipped"),
    }
    Ok(outcome)
}

/// Runs the named tasks in order, or the default tasks when `names` is empty.
///
/// Every name is resolved before anything runs, so an unknown name runs no
/// command at all. Execution stops at the first failing task.
///
/// # Errors
///
/// Returns the first failure, tagged with the task it came from.
pub fn run_tasks(
    ctx: &ServiceContext,
    config: &TasksConfig,
    names: &[String],
    posargs: &[String],
) -> Result<Vec<TaskReport>, TaskFailure> {
    let kinds = if names.is_empty() {
        TaskKind::DEFAULTS.to_vec()
    } else {
        names
            .iter()
            .map(|name| {
                TaskKind::lookup(name)
                    .map_err(|source| TaskFailure { task: name.clone(), source })
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    let mut reports = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let outcome = run_kind(ctx, config, kind, posargs)
            .map_err(|source| TaskFailure { task: kind.name().to_string(), source })?;
        reports.push(TaskReport { task: kind, outcome });
    }
    Ok(reports)
}

/// Runs the default tasks (lint, type-check, test, build-docs) in order.
///
/// # Errors
///
/// Returns the first failure, tagged with the task it came from.
pub fn run_default(
    ctx: &ServiceContext,
    config: &TasksConfig,
    posargs: &[String],
) -> Result<Vec<TaskReport>, TaskFailure> {
    run_tasks(ctx, config, &[], posargs)
}
