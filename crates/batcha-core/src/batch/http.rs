//! reqwest-backed service clients
//!
//! Requests go to a configured endpoint unsigned; point the endpoints at a
//! signing proxy or a local emulator.

use super::api::{BatchApi, LogsApi};
use super::types::{
    GetLogEventsRequest, JobDefinition, JobDetail, JobStatus, JobSummary, LogEventsPage,
    RegisterJobDefinitionResponse, SubmitJobRequest, SubmitJobResponse,
};
use crate::config::Config;
use crate::error::{BatchaError, BatchaResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::instrument;

const LOGS_TARGET_PREFIX: &str = "Logs_20140328";
const LOGS_CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Pull the service's `message` out of an error body when it has one
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("Message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

async fn read_response<T: DeserializeOwned>(
    operation: &str,
    response: reqwest::Response,
) -> BatchaResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BatchaError::service(
            operation,
            status.as_u16(),
            error_message(&body),
        ));
    }

    let value: Value = response
        .json()
        .await
        .map_err(|e| BatchaError::json(format!("failed to parse {} response: {}", operation, e)))?;

    tracing::debug!(
        "{} response: {}",
        operation,
        serde_json::to_string_pretty(&value).unwrap_or_default()
    );

    serde_json::from_value(value)
        .map_err(|e| BatchaError::json(format!("unexpected {} response: {}", operation, e)))
}

/// AWS Batch REST client
#[derive(Debug, Clone)]
pub struct HttpBatchClient {
    http_client: Client,
    endpoint: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribeJobDefinitionsOutput {
    #[serde(default)]
    job_definitions: Vec<Value>,
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Deserialize)]
struct DescribeJobsOutput {
    #[serde(default)]
    jobs: Vec<JobDetail>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListJobsOutput {
    #[serde(default)]
    job_summary_list: Vec<JobSummary>,
}

impl HttpBatchClient {
    pub fn new(endpoint: impl Into<String>, http_client: Client) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> BatchaResult<Self> {
        Ok(Self::new(config.batch_endpoint()?, Client::new()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        body: &Value,
    ) -> BatchaResult<T> {
        let url = format!("{}{}", self.endpoint, path);

        tracing::debug!(
            "{} request to {}: {}",
            operation,
            url,
            serde_json::to_string_pretty(body).unwrap_or_default()
        );

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        read_response(operation, response).await
    }
}

#[async_trait]
impl BatchApi for HttpBatchClient {
    #[instrument(skip(self), level = "debug")]
    async fn describe_job_definitions(
        &self,
        name: &str,
        status: &str,
    ) -> BatchaResult<Vec<JobDefinition>> {
        let mut definitions = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut body = json!({
                "jobDefinitionName": name,
                "status": status,
            });
            if let Some(token) = &next_token {
                body["nextToken"] = json!(token);
            }

            let page: DescribeJobDefinitionsOutput = self
                .post("DescribeJobDefinitions", "/v1/describejobdefinitions", &body)
                .await?;

            for raw in page.job_definitions {
                definitions.push(JobDefinition::from_value(raw)?);
            }

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }

        Ok(definitions)
    }

    async fn register_job_definition(
        &self,
        body: Value,
    ) -> BatchaResult<RegisterJobDefinitionResponse> {
        self.post("RegisterJobDefinition", "/v1/registerjobdefinition", &body)
            .await
    }

    async fn submit_job(&self, request: SubmitJobRequest) -> BatchaResult<SubmitJobResponse> {
        let body = serde_json::to_value(&request)?;
        self.post("SubmitJob", "/v1/submitjob", &body).await
    }

    async fn describe_jobs(&self, job_ids: Vec<String>) -> BatchaResult<Vec<JobDetail>> {
        let output: DescribeJobsOutput = self
            .post("DescribeJobs", "/v1/describejobs", &json!({ "jobs": job_ids }))
            .await?;
        Ok(output.jobs)
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_jobs(
        &self,
        queue: &str,
        status: JobStatus,
        max_results: u32,
    ) -> BatchaResult<Vec<JobSummary>> {
        let body = json!({
            "jobQueue": queue,
            "jobStatus": status,
            "maxResults": max_results,
        });
        let output: ListJobsOutput = self.post("ListJobs", "/v1/listjobs", &body).await?;
        Ok(output.job_summary_list)
    }
}

/// CloudWatch Logs JSON-protocol client
#[derive(Debug, Clone)]
pub struct HttpLogsClient {
    http_client: Client,
    endpoint: String,
}

impl HttpLogsClient {
    pub fn new(endpoint: impl Into<String>, http_client: Client) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> BatchaResult<Self> {
        Ok(Self::new(config.logs_endpoint()?, Client::new()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LogsApi for HttpLogsClient {
    async fn get_log_events(&self, request: GetLogEventsRequest) -> BatchaResult<LogEventsPage> {
        let url = format!("{}/", self.endpoint);
        let response = self
            .http_client
            .post(&url)
            .header("X-Amz-Target", format!("{}.GetLogEvents", LOGS_TARGET_PREFIX))
            .header("Content-Type", LOGS_CONTENT_TYPE)
            .body(serde_json::to_vec(&request)?)
            .send()
            .await?;

        read_response("GetLogEvents", response).await
    }
}
