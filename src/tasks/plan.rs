//! Decision record and step planning.
//!
//! Every filesystem fact a task branches on is captured in a [`Probe`]
//! before anything runs. [`plan`] turns a definition plus that record into
//! the exact [`Step`] sequence, without touching disk or spawning processes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::error::TaskError;
use super::layout::{DOCS_BUILD_DIR, SRC_DIR, TESTS_DIR};
use super::registry::{TaskDefinition, TaskKind};
use super::requirement::Requirement;
use crate::ports::filesystem::FileSystem;

/// Coverage data file written by the test task.
pub const COVERAGE_FILE: &str = ".coverage";

/// Message logged when the test task has nothing to run.
pub const NO_TESTS_MESSAGE: &str = "No tests/ directory found; skipping tests session.";

/// Existence of every path a task depends on, taken once up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Probe {
    results: BTreeMap<PathBuf, bool>,
}

impl Probe {
    /// Checks each path through the filesystem port.
    #[must_use]
    pub fn take(fs: &dyn FileSystem, paths: &[PathBuf]) -> Self {
        let results = paths.iter().map(|path| (path.clone(), fs.exists(path))).collect();
        Self { results }
    }

    /// Builds a record from known results.
    #[must_use]
    pub fn from_results(results: impl IntoIterator<Item = (PathBuf, bool)>) -> Self {
        Self { results: results.into_iter().collect() }
    }

    /// Whether `path` existed when probed. Unprobed paths count as absent.
    #[must_use]
    pub fn exists(&self, path: &Path) -> bool {
        self.results.get(path).copied().unwrap_or(false)
    }
}

/// An external command as declared by a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program to run.
    pub program: String,
    /// Arguments passed to it.
    pub args: Vec<String>,
    /// Whether the program may resolve outside the task environment.
    pub external: bool,
}

impl CommandSpec {
    /// A command that is expected to live in the task environment.
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            external: false,
        }
    }

    /// Marks the command as allowed to resolve outside the environment.
    #[must_use]
    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }

    /// Program followed by arguments.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One planned action of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Change the session working directory.
    Chdir(PathBuf),
    /// Install requirements into the task environment.
    Install(Vec<Requirement>),
    /// Set an environment variable for the remaining commands of the task.
    SetEnv {
        /// Variable name.
        key: String,
        /// Variable value.
        value: String,
    },
    /// Create a directory and its parents if missing.
    CreateDir(PathBuf),
    /// Run an external command.
    Run(CommandSpec),
    /// Stop here and report a successful skip.
    Skip(String),
}

/// The full, ordered step sequence for one task invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Task the plan belongs to.
    pub task: TaskKind,
    /// Steps in execution order.
    pub steps: Vec<Step>,
    /// Artifact the task is expected to leave on disk.
    pub artifact: Option<PathBuf>,
}

impl Plan {
    /// Commands the plan runs, in order, ignoring installs.
    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.steps.iter().filter_map(|step| match step {
            Step::Run(command) => Some(command),
            _ => None,
        })
    }
}

fn editable_install() -> Step {
    Step::Run(CommandSpec::new("pip", ["install", "-e", "."]).external())
}

/// Plans a task from its definition, the decision record, and posargs.
///
/// # Errors
///
/// Returns [`TaskError::MissingDirectory`] for the first precondition the
/// probe reports absent; no steps are produced in that case.
pub fn plan(
    definition: &TaskDefinition,
    probe: &Probe,
    posargs: &[String],
) -> Result<Plan, TaskError> {
    if let Some(missing) = definition.preconditions.iter().find(|p| !probe.exists(&p.path)) {
        return Err(TaskError::MissingDirectory {
            path: missing.label.clone(),
            message: missing.message.clone(),
        });
    }

    let layout = &definition.layout;
    let workdir = Step::Chdir(definition.working_directory.clone());
    let install = Step::Install(definition.tools.clone());

    let (steps, artifact) = match definition.kind {
        TaskKind::Lint => (
            vec![
                workdir,
                install,
                Step::Run(CommandSpec::new("ruff", ["format", SRC_DIR, TESTS_DIR]).external()),
                Step::Run(CommandSpec::new("ruff", ["check", SRC_DIR, TESTS_DIR]).external()),
            ],
            None,
        ),
        TaskKind::TypeCheck => {
            let mut targets = vec![SRC_DIR];
            if probe.exists(&layout.tests_dir) {
                targets.push(TESTS_DIR);
            }
            let check = Step::Run(CommandSpec::new("mypy", targets));
            (vec![workdir, editable_install(), install, check], None)
        }
        TaskKind::Test => {
            let mut steps = vec![workdir, editable_install(), install];
            if probe.exists(&layout.tests_dir) {
                steps.push(Step::SetEnv {
                    key: "COVERAGE_FILE".into(),
                    value: COVERAGE_FILE.into(),
                });
                steps.push(Step::Run(CommandSpec::new(
                    "coverage",
                    ["run", "-m", "pytest", TESTS_DIR],
                )));
                (steps, Some(definition.working_directory.join(COVERAGE_FILE)))
            } else {
                steps.push(Step::Skip(NO_TESTS_MESSAGE.into()));
                (steps, None)
            }
        }
        TaskKind::BuildDocs => (
            vec![
                install,
                workdir,
                editable_install(),
                Step::Chdir(layout.docs_dir.clone()),
                Step::CreateDir(layout.docs_build_dir.clone()),
                Step::Run(CommandSpec::new("sphinx-build", ["-W", ".", DOCS_BUILD_DIR])),
            ],
            Some(layout.docs_build_dir.clone()),
        ),
        TaskKind::Coverage => {
            let xml = posargs.first().is_some_and(|arg| arg == "xml");
            let report = if xml { "xml" } else { "report" };
            (
                vec![
                    workdir,
                    install,
                    Step::Run(CommandSpec::new("coverage", ["combine"])),
                    Step::Run(CommandSpec::new("coverage", [report])),
                ],
                xml.then(|| definition.working_directory.join("coverage.xml")),
            )
        }
    };

    Ok(Plan { task: definition.kind, steps, artifact })
}
