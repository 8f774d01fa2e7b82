//! Run command implementation

use super::load_app;
use crate::args::ConfigArg;
use crate::console::CLIConsole;
use batcha_core::error::BatchaResult;
use batcha_core::{RunEvent, RunOptions};
use tokio_util::sync::CancellationToken;

pub async fn execute(
    config: &ConfigArg,
    options: RunOptions,
    console: &CLIConsole,
    cancel: &CancellationToken,
) -> BatchaResult<()> {
    let app = load_app(config)?;

    app.run(options, cancel, |event| match event {
        RunEvent::Submitted { job_name, job_id } => {
            console.success(&format!("Submitted job: {} (ID: {})", job_name, job_id))
        }
        RunEvent::Waiting { job_id } => console.print(&format!("Waiting for job {}...", job_id)),
        RunEvent::StatusChanged(status) => console.print(&format!("  {}", status)),
        RunEvent::Succeeded => console.success("Job succeeded."),
    })
    .await?;
    Ok(())
}
