//! Logs command implementation

use super::load_app;
use crate::args::ConfigArg;
use crate::console::CLIConsole;
use batcha_core::error::BatchaResult;
use batcha_core::{LogsOptions, LogsOutput};
use chrono::{DateTime, SecondsFormat, Utc};
use tokio_util::sync::CancellationToken;

pub async fn execute(
    config: &ConfigArg,
    options: LogsOptions,
    console: &CLIConsole,
    cancel: &CancellationToken,
) -> BatchaResult<()> {
    let app = load_app(config)?;

    app.logs(options, cancel, |output| match output {
        LogsOutput::Started {
            job_name,
            job_id,
            log_group,
            log_stream,
        } => {
            console.print(&format!("Job: {} ({})", job_name, job_id));
            console.print(&format!("Log: {} / {}", log_group, log_stream));
            console.print_separator();
        }
        LogsOutput::Event(event) => {
            console.print(&format!(
                "{}  {}",
                format_timestamp(event.timestamp),
                event.message
            ));
        }
    })
    .await
}

/// RFC 3339 in UTC for an epoch-milliseconds timestamp
fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| millis.to_string())
}
