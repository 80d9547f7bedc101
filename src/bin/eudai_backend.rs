//! Binary entrypoint for the `eudai-backend` CLI.

use std::process::ExitCode;

use clap::Parser;
use eudai_tasks::cli::BackendCli;
use eudai_tasks::settings::Settings;

fn main() -> ExitCode {
    let cli = BackendCli::parse();
    eudai_tasks::logging::init(false);

    match Settings::from_process_env(Some(&cli.env_file)) {
        Ok(settings) => {
            tracing::debug!(
                app_name = %settings.app_name,
                app_version = %settings.app_version,
                "settings loaded"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
