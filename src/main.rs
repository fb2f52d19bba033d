//! check_json - JSON endpoint probe
//!
//! Prints one status line per evaluated document and exits with the
//! plugin status code (0 OK, 1 WARNING, 2 CRITICAL, 3 UNKNOWN).

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::debug;

use check_json::cli::Cli;
use check_json::config::{CheckSettings, Config};
use check_json::error::{CheckError, CheckResult};
use check_json::probe::{self, Outcome};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let first_line = err.to_string().lines().next().unwrap_or_default().to_string();
            return emit(&Outcome::from_error(CheckError::Usage(first_line)));
        }
    };

    // Initialize logging
    if let Err(e) = check_json::init_logging(&cli.log_level.to_string()) {
        eprintln!("{}", e);
    }

    debug!(version = env!("CARGO_PKG_VERSION"), "Starting check_json");

    let outcome = match resolve_settings(&cli) {
        Ok(settings) => probe::run(&settings).await,
        Err(err) => Outcome::from_error(err),
    };

    emit(&outcome)
}

/// Load the config file and apply CLI overrides
fn resolve_settings(cli: &Cli) -> CheckResult<CheckSettings> {
    let config = Config::from_cli(cli)?;
    Ok(config.merge_cli(cli)?)
}

fn emit(outcome: &Outcome) -> ExitCode {
    for line in outcome.lines() {
        println!("{}", line);
    }
    ExitCode::from(outcome.exit_code())
}
