use super::{App, definition_name};
use crate::batch::{JobStatus, SubmitJobRequest, SubmitJobResponse};
use crate::error::{BatchaError, BatchaResult, ResultExt};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

/// Options for `run`
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overrides `job_queue` from config
    pub job_queue: Option<String>,
    /// Defaults to the definition name
    pub job_name: Option<String>,
    pub parameters: BTreeMap<String, String>,
    pub wait: bool,
}

/// Progress reported while a job is submitted and awaited
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    Submitted { job_name: String, job_id: String },
    Waiting { job_id: String },
    StatusChanged(JobStatus),
    Succeeded,
}

impl App {
    /// Submit a job against the latest ACTIVE revision, optionally waiting for it
    pub async fn run<F>(
        &self,
        options: RunOptions,
        cancel: &CancellationToken,
        mut on_event: F,
    ) -> BatchaResult<SubmitJobResponse>
    where
        F: FnMut(RunEvent),
    {
        let job_queue = options
            .job_queue
            .filter(|q| !q.is_empty())
            .or_else(|| self.config.job_queue.clone().filter(|q| !q.is_empty()))
            .ok_or_else(|| {
                BatchaError::invalid_input_field(
                    "job queue is required: set job_queue in config or use --job-queue",
                    "job_queue",
                )
            })?;

        let document = self.canonical_document().await?;
        let name = definition_name(&document)?;
        let latest = self.latest_active(&name).await?;

        let request = SubmitJobRequest {
            job_name: options.job_name.filter(|n| !n.is_empty()).unwrap_or(name),
            job_queue,
            job_definition: latest.arn,
            parameters: options.parameters,
        };
        tracing::debug!(?request, "submitting job");

        let submitted = self
            .batch
            .submit_job(request)
            .await
            .context("failed to submit job")?;

        on_event(RunEvent::Submitted {
            job_name: submitted.job_name.clone(),
            job_id: submitted.job_id.clone(),
        });

        if options.wait {
            self.wait_for_job(&submitted.job_id, cancel, &mut on_event)
                .await?;
        }
        Ok(submitted)
    }

    async fn wait_for_job<F>(
        &self,
        job_id: &str,
        cancel: &CancellationToken,
        on_event: &mut F,
    ) -> BatchaResult<()>
    where
        F: FnMut(RunEvent),
    {
        on_event(RunEvent::Waiting {
            job_id: job_id.to_string(),
        });

        let mut last_status = None;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Err(BatchaError::Cancelled),
                _ = tokio::time::sleep(self.wait_interval) => {}
            }

            let job = self.describe_job(job_id).await?;
            if last_status != Some(job.status) {
                on_event(RunEvent::StatusChanged(job.status));
                last_status = Some(job.status);
            }

            match job.status {
                JobStatus::Succeeded => {
                    on_event(RunEvent::Succeeded);
                    return Ok(());
                }
                JobStatus::Failed => {
                    return Err(BatchaError::job_failed(
                        job_id,
                        job.status_reason.unwrap_or_default(),
                    ));
                }
                _ => {}
            }
        }
    }
}
