//! Register command implementation

use super::load_app;
use crate::args::ConfigArg;
use crate::console::CLIConsole;
use batcha_core::RegisterOutcome;
use batcha_core::error::BatchaResult;

pub async fn execute(config: &ConfigArg, dry_run: bool, console: &CLIConsole) -> BatchaResult<()> {
    let app = load_app(config)?;

    match app.register(dry_run).await? {
        RegisterOutcome::DryRun(json) => console.print(&json),
        RegisterOutcome::Unchanged { revision } => console.print(&format!(
            "No changes detected. Skip registration. (current revision: {})",
            revision
        )),
        RegisterOutcome::Registered { name, revision } => {
            console.success(&format!("Registered: {} revision {}", name, revision))
        }
    }
    Ok(())
}
