//! Command routing logic for CLI

use crate::args::{Cli, Commands};
use crate::commands;
use crate::console::CLIConsole;
use crate::signal::cancel_on_signal;
use batcha_core::error::{BatchaError, BatchaResult};
use tokio_util::sync::CancellationToken;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> BatchaResult<()> {
    let console = CLIConsole::new(cli.verbose);
    let cancel = cancel_on_signal();

    tokio::select! {
        result = dispatch(cli.command, &console, &cancel) => result,
        _ = cancel.cancelled() => Err(BatchaError::Cancelled),
    }
}

async fn dispatch(
    command: Commands,
    console: &CLIConsole,
    cancel: &CancellationToken,
) -> BatchaResult<()> {
    match command {
        Commands::Init {
            job_definition_name,
            region,
            output,
        } => commands::init::execute(job_definition_name, region, output, console).await,
        Commands::Register { config, dry_run } => {
            commands::register::execute(&config, dry_run, console).await
        }
        Commands::Render { config } => commands::render::execute(&config, console).await,
        Commands::Diff { config } => commands::diff::execute(&config, console).await,
        Commands::Status { config } => commands::status::execute(&config, console).await,
        Commands::Run {
            config,
            job_queue,
            job_name,
            parameters,
            wait,
        } => {
            let options = batcha_core::RunOptions {
                job_queue,
                job_name,
                parameters: parameters.into_iter().collect(),
                wait,
            };
            commands::run::execute(&config, options, console, cancel).await
        }
        Commands::Logs {
            config,
            job_id,
            job_queue,
            follow,
            since,
        } => {
            let options = batcha_core::LogsOptions {
                job_id,
                job_queue,
                follow,
                since,
            };
            commands::logs::execute(&config, options, console, cancel).await
        }
        Commands::Verify { config } => commands::verify::execute(&config, console).await,
        Commands::Version => {
            commands::version::execute(console);
            Ok(())
        }
    }
}
