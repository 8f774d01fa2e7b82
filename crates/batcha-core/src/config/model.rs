//! Configuration data model

use crate::error::{BatchaError, BatchaResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the Terraform state lookup plugin
pub const TFSTATE_PLUGIN: &str = "tfstate";

/// batcha configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Service region, falls back to `AWS_REGION` / `AWS_DEFAULT_REGION`
    #[serde(default)]
    pub region: String,
    /// Path to the job definition template
    #[serde(default)]
    pub job_definition: String,
    /// Default job queue for `run` and `logs`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_queue: Option<String>,
    /// Batch service base URL override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Logs service base URL override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<Plugin>,
}

/// Plugin configuration block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    pub name: String,
    #[serde(default)]
    pub config: PluginConfig,
}

/// Plugin-specific settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default)]
    pub url: String,
}

impl Config {
    /// Check required fields
    pub fn validate(&self) -> BatchaResult<()> {
        if self.job_definition.trim().is_empty() {
            return Err(BatchaError::config("job_definition is required in config"));
        }
        Ok(())
    }

    /// Template path, resolved against the config file's directory when relative
    pub fn template_path(&self, config_path: &Path) -> PathBuf {
        let path = Path::new(&self.job_definition);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match config_path.parent() {
            Some(dir) => dir.join(path),
            None => path.to_path_buf(),
        }
    }

    /// Base URL of the Batch service
    pub fn batch_endpoint(&self) -> BatchaResult<String> {
        self.service_endpoint(self.endpoint.as_deref(), "batch")
    }

    /// Base URL of the Logs service
    pub fn logs_endpoint(&self) -> BatchaResult<String> {
        self.service_endpoint(self.logs_endpoint.as_deref(), "logs")
    }

    fn service_endpoint(&self, explicit: Option<&str>, service: &str) -> BatchaResult<String> {
        if let Some(url) = explicit.filter(|u| !u.is_empty()) {
            return Ok(url.trim_end_matches('/').to_string());
        }
        if self.region.is_empty() {
            return Err(BatchaError::config(format!(
                "cannot resolve the {} endpoint: region is not set (set region in config or AWS_REGION)",
                service
            )));
        }
        Ok(format!("https://{}.{}.amazonaws.com", service, self.region))
    }

    /// URLs of configured Terraform state plugins
    pub fn tfstate_urls(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().filter_map(|p| {
            if p.name == TFSTATE_PLUGIN {
                Some(p.config.url.as_str())
            } else {
                tracing::warn!(plugin = %p.name, "ignoring unknown plugin");
                None
            }
        })
    }
}
