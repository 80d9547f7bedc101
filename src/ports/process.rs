//! Process runner port for external tool invocations.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A fully resolved external command, as handed to a [`ProcessRunner`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    /// Program name or path.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
    /// Working directory the program starts in.
    pub cwd: PathBuf,
    /// Environment variables set on top of the inherited environment.
    pub env: BTreeMap<String, String>,
}

impl Invocation {
    /// Returns the program followed by its arguments, the way a shell would echo it.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// The result of a finished process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Exit code of the process; `-1` when it was terminated by a signal.
    pub exit_code: i32,
}

impl CommandOutcome {
    /// Returns `true` when the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs external programs and waits for them to exit.
///
/// Abstracting process execution lets the orchestration logic be driven by
/// fakes and cassettes that record invocations and simulate exit codes.
pub trait ProcessRunner: Send + Sync {
    /// Runs the invocation to completion and returns its exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned. A non-zero exit
    /// is not an error at this level.
    fn run(
        &self,
        invocation: &Invocation,
    ) -> Result<CommandOutcome, Box<dyn std::error::Error + Send + Sync>>;
}
