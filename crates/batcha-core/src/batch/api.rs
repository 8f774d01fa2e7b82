//! Service traits

use super::types::{
    GetLogEventsRequest, JobDefinition, JobDetail, JobStatus, JobSummary, LogEventsPage,
    RegisterJobDefinitionResponse, SubmitJobRequest, SubmitJobResponse,
};
use crate::error::BatchaResult;
use async_trait::async_trait;
use serde_json::Value;

/// The subset of AWS Batch used by batcha
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BatchApi: Send + Sync {
    /// All definitions named `name` with the given status
    async fn describe_job_definitions(
        &self,
        name: &str,
        status: &str,
    ) -> BatchaResult<Vec<JobDefinition>>;

    /// Register a new revision; `body` uses service (camelCase) keys
    async fn register_job_definition(
        &self,
        body: Value,
    ) -> BatchaResult<RegisterJobDefinitionResponse>;

    async fn submit_job(&self, request: SubmitJobRequest) -> BatchaResult<SubmitJobResponse>;

    async fn describe_jobs(&self, job_ids: Vec<String>) -> BatchaResult<Vec<JobDetail>>;

    async fn list_jobs(
        &self,
        queue: &str,
        status: JobStatus,
        max_results: u32,
    ) -> BatchaResult<Vec<JobSummary>>;
}

/// The subset of CloudWatch Logs used by batcha
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogsApi: Send + Sync {
    async fn get_log_events(&self, request: GetLogEventsRequest) -> BatchaResult<LogEventsPage>;
}
