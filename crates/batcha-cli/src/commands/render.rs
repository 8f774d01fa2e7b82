//! Render command implementation

use super::load_app;
use crate::args::ConfigArg;
use crate::console::CLIConsole;
use batcha_core::error::BatchaResult;

/// Print the canonical job definition without contacting the service
pub async fn execute(config: &ConfigArg, console: &CLIConsole) -> BatchaResult<()> {
    let app = load_app(config)?;
    console.info(&format!("rendering {}", app.template_path().display()));
    console.print(&app.render().await?);
    Ok(())
}
