//! Verify command implementation

use super::load_app;
use crate::args::ConfigArg;
use crate::console::CLIConsole;
use batcha_core::error::{BatchaError, BatchaResult};
use batcha_core::{RegisterJobDefinitionInput, validate_input};

/// Validate the rendered definition locally, printing each step
pub async fn execute(config: &ConfigArg, console: &CLIConsole) -> BatchaResult<()> {
    let app = load_app(config)?;

    let document = app.canonical_document().await?;
    console.ok("template rendered successfully");

    let input = RegisterJobDefinitionInput::from_document(&document)?;
    console.ok("valid RegisterJobDefinitionInput structure");

    let errors = validate_input(&input);
    if !errors.is_empty() {
        for error in &errors {
            console.ng(error);
        }
        return Err(BatchaError::validation(errors));
    }

    console.ok("all validations passed");
    console.print("Verify OK");
    Ok(())
}
