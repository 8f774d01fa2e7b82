use super::{App, definition_name};
use crate::batch::{
    GetLogEventsRequest, JobStatus, LogEvent, extract_log_info, matches_job_definition,
};
use crate::error::{BatchaError, BatchaResult, ResultExt};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Jobs fetched per status when searching for the latest job
const LIST_JOBS_PER_STATUS: u32 = 5;

/// Options for `logs`
#[derive(Debug, Clone, Default)]
pub struct LogsOptions {
    /// Job to read; the latest job of the definition when absent
    pub job_id: Option<String>,
    /// Overrides `job_queue` from config
    pub job_queue: Option<String>,
    pub follow: bool,
    /// Only events newer than this
    pub since: Option<Duration>,
}

/// Items emitted by `logs`
#[derive(Debug, Clone, PartialEq)]
pub enum LogsOutput {
    Started {
        job_name: String,
        job_id: String,
        log_group: String,
        log_stream: String,
    },
    Event(LogEvent),
}

impl App {
    /// Stream a job's container log events into `sink`
    pub async fn logs<F>(
        &self,
        options: LogsOptions,
        cancel: &CancellationToken,
        mut sink: F,
    ) -> BatchaResult<()>
    where
        F: FnMut(LogsOutput),
    {
        let job_id = match options.job_id.filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => {
                let queue = options
                    .job_queue
                    .filter(|q| !q.is_empty())
                    .or_else(|| self.config.job_queue.clone().filter(|q| !q.is_empty()));
                self.find_latest_job_id(queue.as_deref()).await?
            }
        };

        let job = self.describe_job(&job_id).await?;
        let (log_group, log_stream) = extract_log_info(&job)?;

        sink(LogsOutput::Started {
            job_name: job.job_name.clone(),
            job_id: job.job_id.clone(),
            log_group: log_group.clone(),
            log_stream: log_stream.clone(),
        });

        let mut request = GetLogEventsRequest {
            log_group_name: log_group,
            log_stream_name: log_stream,
            start_from_head: Some(true),
            ..Default::default()
        };
        if let Some(since) = options.since.filter(|d| !d.is_zero()) {
            let since_ms = i64::try_from(since.as_millis()).unwrap_or(i64::MAX);
            request.start_time = Some(chrono::Utc::now().timestamp_millis().saturating_sub(since_ms));
            request.start_from_head = Some(false);
        }

        let mut prev_token: Option<String> = None;
        loop {
            if cancel.is_cancelled() {
                return Err(BatchaError::Cancelled);
            }

            let page = self
                .logs
                .get_log_events(request.clone())
                .await
                .context("failed to get log events")?;

            let no_new_events = page.events.is_empty() && page.next_forward_token == prev_token;
            for event in page.events {
                sink(LogsOutput::Event(event));
            }

            if no_new_events {
                if !options.follow || self.is_job_done(&job_id).await? {
                    break;
                }
                tokio::select! {
                    _ = cancel.cancelled() => return Err(BatchaError::Cancelled),
                    _ = tokio::time::sleep(self.follow_interval) => {}
                }
            }

            prev_token = page.next_forward_token.clone();
            request.next_token = page.next_forward_token;
            request.start_time = None;
            request.start_from_head = None;
        }
        Ok(())
    }

    /// Most recently created job of this definition in `queue`
    async fn find_latest_job_id(&self, queue: Option<&str>) -> BatchaResult<String> {
        let queue = queue.ok_or_else(|| {
            BatchaError::invalid_input_field(
                "job queue is required to find latest job: set job_queue in config or use --job-queue flag",
                "job_queue",
            )
        })?;

        let document = self.canonical_document().await?;
        let name = definition_name(&document)?;

        let mut latest: Option<(i64, String)> = None;
        let mut last_err = None;
        for status in JobStatus::SEARCH_ORDER {
            let summaries = match self
                .batch
                .list_jobs(queue, status, LIST_JOBS_PER_STATUS)
                .await
            {
                Ok(summaries) => summaries,
                Err(e) => {
                    tracing::debug!(%status, error = %e, "list jobs failed");
                    last_err = Some(e);
                    continue;
                }
            };

            for job in summaries {
                let matches = job.job_name == name
                    || job
                        .job_definition
                        .as_deref()
                        .is_some_and(|arn| matches_job_definition(arn, &name));
                if !matches {
                    continue;
                }
                let created_at = job.created_at.unwrap_or_default();
                if latest.as_ref().is_none_or(|(best, _)| created_at > *best) {
                    latest = Some((created_at, job.job_id));
                }
            }
        }

        match (latest, last_err) {
            (Some((_, job_id)), _) => Ok(job_id),
            (None, Some(e)) => Err(BatchaError::other(format!(
                "failed to list jobs in queue {:?}: {}",
                queue, e
            ))),
            (None, None) => Err(BatchaError::not_found_resource(
                format!("no jobs found for {:?} in queue {:?}", name, queue),
                "job",
            )),
        }
    }

    async fn is_job_done(&self, job_id: &str) -> BatchaResult<bool> {
        let jobs = self
            .batch
            .describe_jobs(vec![job_id.to_string()])
            .await
            .context("failed to describe job")?;
        Ok(jobs.first().is_none_or(|job| job.status.is_terminal()))
    }
}
