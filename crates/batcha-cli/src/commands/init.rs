//! Init command implementation

use crate::console::CLIConsole;
use batcha_core::batch::HttpBatchClient;
use batcha_core::config::apply_env_fallbacks;
use batcha_core::error::BatchaResult;
use batcha_core::{App, Config, InitOptions};
use std::path::PathBuf;

/// Fetch an active definition and write `job-definition.json` and `batcha.yml`
pub async fn execute(
    job_definition_name: String,
    region: Option<String>,
    output: PathBuf,
    console: &CLIConsole,
) -> BatchaResult<()> {
    // Only region and endpoint matter here; there is no config file yet
    let mut config = Config {
        region: region.unwrap_or_default(),
        ..Default::default()
    };
    apply_env_fallbacks(&mut config, |key: &str| std::env::var(key).ok());
    let client = HttpBatchClient::from_config(&config)?;

    let options = InitOptions {
        job_definition_name,
        region: config.region,
        output_dir: output,
    };
    let outcome = App::init(&options, &client).await?;

    console.success(&format!("Created {}", outcome.definition_path.display()));
    console.success(&format!("Created {}", outcome.config_path.display()));
    Ok(())
}
