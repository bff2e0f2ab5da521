//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use eyre::WrapErr;
use tracing_subscriber::EnvFilter;
use wayfare_cli::CliError;

/// Environment variable holding the log filter, e.g. `wayfare_planner=debug`.
const LOG_ENV: &str = "WAYFARE_LOG";

fn main() -> eyre::Result<()> {
    // stdout carries the JSON output; logs go to stderr.
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match wayfare_cli::run() {
        Ok(()) => Ok(()),
        // Clap prints usage, help and version itself with the right exit code.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => Err(err).wrap_err("wayfare failed"),
    }
}
