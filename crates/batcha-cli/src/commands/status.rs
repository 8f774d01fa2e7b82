//! Status command implementation

use super::load_app;
use crate::args::ConfigArg;
use crate::console::CLIConsole;
use batcha_core::error::BatchaResult;

pub async fn execute(config: &ConfigArg, console: &CLIConsole) -> BatchaResult<()> {
    let app = load_app(config)?;
    let report = app.status().await?;

    let Some(latest) = report.latest else {
        console.print(&format!(
            "No active job definition found for {:?}.",
            report.name
        ));
        return Ok(());
    };

    console.field("Name", &latest.name);
    console.field("ARN", &latest.arn);
    console.field("Revision", &latest.revision.to_string());
    console.field("Status", &latest.status);
    console.field("Type", &latest.definition_type);

    if let Some(cp) = &latest.container_properties {
        console.field("Image", cp.image.as_deref().unwrap_or_default());
        for requirement in &cp.resource_requirements {
            console.field(&requirement.resource_type, &requirement.value);
        }
    }

    console.print(&format!("Active revisions: {}", report.active_revisions));
    Ok(())
}
