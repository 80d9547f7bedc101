//! Live process runner using `std::process::Command`.

use std::process::Command;

use crate::ports::process::{CommandOutcome, Invocation, ProcessRunner};

/// Live runner that spawns the program with inherited stdio and waits for it.
pub struct LiveProcessRunner;

impl ProcessRunner for LiveProcessRunner {
    fn run(
        &self,
        invocation: &Invocation,
    ) -> Result<CommandOutcome, Box<dyn std::error::Error + Send + Sync>> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .envs(&invocation.env)
            .status()?;
        Ok(CommandOutcome { exit_code: status.code().unwrap_or(-1) })
    }
}
