//! batcha operations
//!
//! [`App`] ties a loaded [`Config`] to the template renderer and the service
//! clients. Each CLI subcommand maps onto one method here; printing is left to
//! the caller.

mod diff;
mod init;
mod logs;
mod register;
mod run;
mod status;

pub use diff::DiffOutcome;
pub use init::{CONFIG_FILE_NAME, DEFINITION_FILE_NAME, InitOptions, InitOutcome};
pub use logs::{LogsOptions, LogsOutput};
pub use register::RegisterOutcome;
pub use run::{RunEvent, RunOptions};
pub use status::StatusReport;

use crate::batch::{
    ACTIVE_STATUS, BatchApi, HttpBatchClient, HttpLogsClient, JobDefinition, JobDetail, LogsApi,
    pick_latest_revision,
};
use crate::casing::{to_pascal_case, walk_keys};
use crate::config::{Config, load_config};
use crate::error::{BatchaError, BatchaResult, ResultExt};
use crate::template::{EnvLookup, TemplateRenderer};
use crate::tfstate::TfState;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Delay between job status checks while waiting
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_secs(10);
/// Delay between log polls in follow mode
pub const FOLLOW_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Application state for one config file
pub struct App {
    config: Config,
    config_path: PathBuf,
    batch: Arc<dyn BatchApi>,
    logs: Arc<dyn LogsApi>,
    env: EnvLookup,
    wait_interval: Duration,
    follow_interval: Duration,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("config_path", &self.config_path)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Load `config_path` and connect to the configured endpoints
    pub fn new(config_path: impl AsRef<Path>) -> BatchaResult<Self> {
        let config_path = config_path.as_ref();
        let config = load_config(config_path)?;
        let batch = Arc::new(HttpBatchClient::from_config(&config)?);
        let logs = Arc::new(HttpLogsClient::from_config(&config)?);
        Ok(Self::with_clients(config, config_path, batch, logs))
    }

    /// Build from an already loaded config and explicit clients
    pub fn with_clients(
        config: Config,
        config_path: impl Into<PathBuf>,
        batch: Arc<dyn BatchApi>,
        logs: Arc<dyn LogsApi>,
    ) -> Self {
        Self {
            config,
            config_path: config_path.into(),
            batch,
            logs,
            env: Arc::new(|key: &str| std::env::var(key).ok()),
            wait_interval: WAIT_POLL_INTERVAL,
            follow_interval: FOLLOW_POLL_INTERVAL,
        }
    }

    /// Replace the environment used by `env` / `must_env`
    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    /// Override the polling delays
    pub fn with_poll_intervals(mut self, wait: Duration, follow: Duration) -> Self {
        self.wait_interval = wait;
        self.follow_interval = follow;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Path of the job definition template
    pub fn template_path(&self) -> PathBuf {
        self.config.template_path(&self.config_path)
    }

    async fn renderer(&self) -> BatchaResult<TemplateRenderer> {
        let mut renderer = TemplateRenderer::new().with_env(Arc::clone(&self.env));
        for url in self.config.tfstate_urls() {
            tracing::debug!(url, "loading terraform state");
            renderer = renderer.with_tfstate(TfState::load(url).await?);
        }
        Ok(renderer)
    }

    /// Render the template into a JSON object, keys as written
    pub async fn render_document(&self) -> BatchaResult<Value> {
        let renderer = self.renderer().await?;
        renderer.render_file(&self.template_path())
    }

    /// Rendered document with service (PascalCase) keys
    pub async fn canonical_document(&self) -> BatchaResult<Value> {
        let rendered = self.render_document().await?;
        Ok(walk_keys(&rendered, to_pascal_case))
    }

    /// Pretty JSON of the canonical document
    pub async fn render(&self) -> BatchaResult<String> {
        let document = self.canonical_document().await?;
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// All ACTIVE revisions of `name`
    async fn active_definitions(&self, name: &str) -> BatchaResult<Vec<JobDefinition>> {
        self.batch
            .describe_job_definitions(name, ACTIVE_STATUS)
            .await
            .context("failed to describe job definitions")
    }

    /// Latest ACTIVE revision of `name`, failing when there is none
    async fn latest_active(&self, name: &str) -> BatchaResult<JobDefinition> {
        let definitions = self.active_definitions(name).await?;
        pick_latest_revision(&definitions).cloned().ok_or_else(|| {
            BatchaError::not_found_resource(
                format!("no active job definition found for {:?}", name),
                "job definition",
            )
        })
    }

    async fn describe_job(&self, job_id: &str) -> BatchaResult<JobDetail> {
        let jobs = self
            .batch
            .describe_jobs(vec![job_id.to_string()])
            .await
            .context("failed to describe job")?;
        jobs.into_iter().next().ok_or_else(|| {
            BatchaError::not_found_resource(format!("job {} not found", job_id), "job")
        })
    }
}

/// `JobDefinitionName` of a canonical document
pub fn definition_name(document: &Value) -> BatchaResult<String> {
    document
        .get("JobDefinitionName")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            BatchaError::invalid_input_field(
                "jobDefinitionName is required in job definition",
                "jobDefinitionName",
            )
        })
}
