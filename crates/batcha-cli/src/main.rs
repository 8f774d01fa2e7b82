//! batcha: declarative AWS Batch job definition deployment
//!
//! ```bash
//! batcha init --job-definition-name my-job --region us-east-1
//! batcha diff --config batcha.yml
//! batcha register --config batcha.yml
//! batcha run --config batcha.yml --wait
//! ```
//!
//! Set `RUST_LOG=debug` (or pass `--verbose`) for request-level logging.

mod args;
mod commands;
mod console;
mod router;
mod signal;

use args::Cli;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins; --verbose only changes the default
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match router::route(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_silent() => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
