//! Registered tasks and their static definitions.

use std::fmt;
use std::path::PathBuf;

use super::error::TaskError;
use super::layout::{ProjectLayout, DOCS_DIR, PROJECT_DIR};
use super::requirement::Requirement;

/// Every task the orchestrator knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Format then style-check the backend.
    Lint,
    /// Type-check the backend.
    TypeCheck,
    /// Run the test suite under coverage.
    Test,
    /// Build the documentation tree.
    BuildDocs,
    /// Combine coverage data and report it.
    Coverage,
}

impl TaskKind {
    /// All tasks in registration order.
    pub const ALL: [Self; 5] =
        [Self::Lint, Self::TypeCheck, Self::Test, Self::BuildDocs, Self::Coverage];

    /// Tasks run when none are named, in order.
    pub const DEFAULTS: [Self; 4] = [Self::Lint, Self::TypeCheck, Self::Test, Self::BuildDocs];

    /// Canonical task name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Lint => "lint",
            Self::TypeCheck => "type-check",
            Self::Test => "test",
            Self::BuildDocs => "build-docs",
            Self::Coverage => "coverage",
        }
    }

    /// Alternative names accepted on the command line.
    #[must_use]
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Lint | Self::Coverage => &[],
            Self::TypeCheck => &["mypy"],
            Self::Test => &["tests"],
            Self::BuildDocs => &["docs-build"],
        }
    }

    /// One-line description for `list`.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Lint => "Lint and format the backend with ruff.",
            Self::TypeCheck => "Type-check the backend with mypy.",
            Self::Test => "Run the test suite with coverage.",
            Self::BuildDocs => "Build the documentation from the top-level docs/ directory.",
            Self::Coverage => "Combine coverage data; pass `-- xml` to write coverage.xml.",
        }
    }

    /// Whether the task is part of the default run.
    #[must_use]
    pub fn is_default(self) -> bool {
        Self::DEFAULTS.contains(&self)
    }

    /// Resolves a task by exact name or alias.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::UnknownTask`] if nothing matches.
    pub fn lookup(name: &str) -> Result<Self, TaskError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name || kind.aliases().contains(&name))
            .ok_or_else(|| TaskError::UnknownTask { name: name.to_string() })
    }

    /// Builds the static definition of this task for `layout`.
    #[must_use]
    pub fn definition(self, layout: &ProjectLayout) -> TaskDefinition {
        let project = Precondition::new(
            layout.project_dir.clone(),
            PROJECT_DIR,
            format!("{PROJECT_DIR} does not exist. Run from the repository root or pass --root."),
        );
        let (preconditions, tools, probes) = match self {
            Self::Lint => (vec![project], vec![Requirement::new("ruff")], Vec::new()),
            Self::TypeCheck => {
                (vec![project], vec![Requirement::new("mypy")], vec![layout.tests_dir.clone()])
            }
            Self::Test => (
                vec![project],
                vec![Requirement::new("pytest"), Requirement::new("coverage").with_extra("toml")],
                vec![layout.tests_dir.clone()],
            ),
            Self::BuildDocs => (
                vec![
                    Precondition::new(
                        layout.docs_dir.clone(),
                        DOCS_DIR,
                        "docs/ directory not found at repo root.",
                    ),
                    project,
                ],
                vec![Requirement::new("sphinx"), Requirement::new("sphinx-rtd-theme")],
                Vec::new(),
            ),
            Self::Coverage => {
                (vec![project], vec![Requirement::new("coverage").with_extra("toml")], Vec::new())
            }
        };
        TaskDefinition {
            kind: self,
            layout: layout.clone(),
            working_directory: layout.project_dir.clone(),
            tools,
            preconditions,
            probes,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A directory that must exist before a task may do anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precondition {
    /// Absolute path checked.
    pub path: PathBuf,
    /// Path relative to the root.
    pub label: String,
    /// Error message when the path is absent.
    pub message: String,
}

impl Precondition {
    fn new(path: PathBuf, label: &str, message: impl Into<String>) -> Self {
        Self { path, label: label.to_string(), message: message.into() }
    }
}

/// Static description of a task: where it runs, what it installs, and
/// which paths it checks.
#[derive(Debug, Clone)]
pub struct TaskDefinition {
    /// Which task this is.
    pub kind: TaskKind,
    /// Layout the paths below were resolved against.
    pub layout: ProjectLayout,
    /// Directory the command sequence runs in.
    pub working_directory: PathBuf,
    /// Tools installed into the task environment.
    pub tools: Vec<Requirement>,
    /// Directories that must exist, checked in order.
    pub preconditions: Vec<Precondition>,
    /// Optional paths whose presence changes the command sequence.
    pub probes: Vec<PathBuf>,
}

impl TaskDefinition {
    /// Every path the decision record must cover, preconditions first.
    #[must_use]
    pub fn probed_paths(&self) -> Vec<PathBuf> {
        self.preconditions.iter().map(|p| p.path.clone()).chain(self.probes.iter().cloned()).collect()
    }
}
