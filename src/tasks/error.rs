//! Error taxonomy for task orchestration.

use thiserror::Error;

/// Why a single task could not complete.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The requested name is not a registered task or alias.
    #[error("no such task: {name} (run `eudai-tasks list` to see registered tasks)")]
    UnknownTask {
        /// Name as given by the invoker.
        name: String,
    },

    /// A directory the task requires is absent.
    #[error("{message}")]
    MissingDirectory {
        /// The missing path, relative to the project root.
        path: String,
        /// Complete message shown to the invoker.
        message: String,
    },

    /// An external command exited with a non-zero status.
    #[error("command `{command}` failed with exit code {exit_code}")]
    ToolFailed {
        /// The command line that failed.
        command: String,
        /// Its exit code (`-1` when killed by a signal).
        exit_code: i32,
    },

    /// An external command could not be started at all.
    #[error("could not run `{command}`: {message}")]
    Spawn {
        /// The command line that could not be started.
        command: String,
        /// Error reported by the process runner.
        message: String,
    },

    /// A command not marked external does not live in the isolated environment.
    #[error("program `{program}` is not installed in the task environment and is not marked external")]
    NotInEnvironment {
        /// Program name as it appears in the command.
        program: String,
    },

    /// A directory could not be created or removed.
    #[error("filesystem error at {path}: {message}")]
    Filesystem {
        /// Path being created or removed.
        path: String,
        /// Error reported by the filesystem.
        message: String,
    },
}

/// A failure of one task within a run, tagged with the task it came from.
#[derive(Debug, Error)]
#[error("Task {task} failed: {source}")]
pub struct TaskFailure {
    /// Name of the failing task, as registered or as requested.
    pub task: String,
    /// Underlying error.
    #[source]
    pub source: TaskError,
}
