//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `acadrec_core` linkage and the fixed data-file location.
//! - Keep output deterministic for quick local sanity checks.

use acadrec_core::{AppConfig, RosterRepository};
use log::{error, info};
use std::process::ExitCode;

const LOG_DIR: &str = "logs";

fn main() -> ExitCode {
    println!("acadrec_core version={}", acadrec_core::core_version());

    match std::env::current_dir() {
        Ok(cwd) => {
            if let Err(err) =
                acadrec_core::init_logging(acadrec_core::default_log_level(), &cwd.join(LOG_DIR))
            {
                eprintln!("logging disabled: {err}");
            }
        }
        Err(err) => eprintln!("logging disabled: {err}"),
    }

    let config = AppConfig::default();
    match config.roster_repository().load() {
        Ok(table) => {
            info!("event=cli_probe module=cli status=ok rows={}", table.len());
            println!("roster path={} records={}", config.data_file.display(), table.len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_probe module=cli status=error error={err}");
            println!("roster path={} error={err}", config.data_file.display());
            ExitCode::FAILURE
        }
    }
}
