//! Configuration for batcha
//!
//! A small YAML file names the job definition template and the region, and
//! optionally a default job queue, service endpoints and plugins.

mod env_loader;
mod file_loader;
mod model;

pub use env_loader::{ENV_BATCH_ENDPOINT, ENV_LOGS_ENDPOINT, apply_env_fallbacks};
pub use file_loader::{load_config, load_config_with_env, load_from_file};
pub use model::{Config, Plugin, PluginConfig, TFSTATE_PLUGIN};
