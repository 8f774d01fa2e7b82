//! AWS Batch and CloudWatch Logs integration
//!
//! Operations talk to the services through the [`BatchApi`] and [`LogsApi`]
//! traits. [`HttpBatchClient`] and [`HttpLogsClient`] implement them over the
//! services' JSON protocols.

mod api;
mod definition;
mod http;
mod types;

pub use api::{BatchApi, LogsApi};
#[cfg(test)]
pub use api::{MockBatchApi, MockLogsApi};
pub use definition::{
    MANAGED_FIELDS, extract_log_info, matches_job_definition, normalize_remote_definition,
    pick_latest_revision, prune_empty, strip_managed_fields,
};
pub use http::{HttpBatchClient, HttpLogsClient};
pub use types::{
    ACTIVE_STATUS, ContainerDetail, ContainerProperties, GetLogEventsRequest, JobDefinition,
    JobDetail, JobStatus, JobSummary, LogConfiguration, LogEvent, LogEventsPage,
    RegisterJobDefinitionResponse, ResourceRequirement, SubmitJobRequest, SubmitJobResponse,
};
