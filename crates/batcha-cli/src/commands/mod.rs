//! CLI commands

pub mod diff;
pub mod init;
pub mod logs;
pub mod register;
pub mod render;
pub mod run;
pub mod status;
pub mod verify;
pub mod version;

use crate::args::ConfigArg;
use batcha_core::App;
use batcha_core::error::BatchaResult;

/// Load the config and connect the service clients
pub(crate) fn load_app(config: &ConfigArg) -> BatchaResult<App> {
    tracing::debug!(path = %config.config.display(), "loading config");
    App::new(&config.config)
}
