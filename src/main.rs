//! Service entrypoint.
//!
//! Parses flags and environment, installs logging, validates the
//! configuration, then runs until a termination signal arrives or the
//! server stops.

use std::process::ExitCode;

use clap::Parser;

use rest_service::config::{validate_config, version_line, Cli};
use rest_service::lifecycle;
use rest_service::observability::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", version_line());
        return ExitCode::SUCCESS;
    }

    if let Err(err) = logging::init(cli.log_level) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    let config = cli.into_config();

    if let Err(err) = validate_config(&config) {
        tracing::error!(
            app = env!("CARGO_PKG_NAME"),
            error = %err,
            "Cannot start, unable to validate config"
        );
        return ExitCode::FAILURE;
    }

    tracing::info!(
        listen_address = %config.listen_address,
        allowed_origins = %config.allowed_origins,
        "Configuration loaded"
    );

    let cause = lifecycle::run(config).await;
    tracing::warn!(cause = %cause, "shutdown");

    if cause.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
