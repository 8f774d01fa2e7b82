//! Diff command implementation

use super::load_app;
use crate::args::ConfigArg;
use crate::console::CLIConsole;
use batcha_core::DiffOutcome;
use batcha_core::error::{BatchaError, BatchaResult};

/// Show remote vs local; differences end in a silent non-zero exit
pub async fn execute(config: &ConfigArg, console: &CLIConsole) -> BatchaResult<()> {
    let app = load_app(config)?;

    match app.diff().await? {
        DiffOutcome::NoDifferences => {
            console.print("No differences found.");
            Ok(())
        }
        DiffOutcome::NewDefinition { name, local } => {
            console.print(&format!(
                "No active job definition found for {:?}. The local definition will be newly registered.",
                name
            ));
            console.print(&local);
            Err(BatchaError::DifferencesFound)
        }
        DiffOutcome::Changed {
            unified,
            added,
            removed,
        } => {
            console.print_diff(&unified);
            console.info(&format!("{} line(s) added, {} line(s) removed", added, removed));
            Err(BatchaError::DifferencesFound)
        }
    }
}
