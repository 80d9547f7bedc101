//! Core library entry for the `eudai-tasks` CLI.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod logging;
pub mod ports;
pub mod settings;
pub mod tasks;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    logging::init(cli.verbose);
    commands::dispatch(&cli)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_lists_tasks() {
        let result = run(["eudai-tasks", "list"]);
        assert!(result.is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["eudai-tasks", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_errors_on_unknown_task_before_running_anything() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let err = run(["eudai-tasks", "--root", root, "run", "deploy"]).unwrap_err();
        assert!(err.contains("no such task: deploy"));
        assert!(!dir.path().join(".eudai-tasks").exists());
    }
}
