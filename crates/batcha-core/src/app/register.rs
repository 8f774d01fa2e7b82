use super::{App, definition_name};
use crate::batch::{normalize_remote_definition, pick_latest_revision};
use crate::casing::{to_camel_case, to_pascal_case, walk_keys};
use crate::error::{BatchaResult, ResultExt};
use serde_json::Value;

/// What `register` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Dry run; carries the pretty JSON that would be registered
    DryRun(String),
    /// Remote already matches; nothing registered
    Unchanged { revision: i64 },
    Registered { name: String, revision: i64 },
}

impl App {
    /// Register the rendered definition unless the latest revision matches it
    pub async fn register(&self, dry_run: bool) -> BatchaResult<RegisterOutcome> {
        let rendered = self.render_document().await?;
        let document = walk_keys(&rendered, to_pascal_case);

        if dry_run {
            return Ok(RegisterOutcome::DryRun(serde_json::to_string_pretty(
                &document,
            )?));
        }

        if let Some(revision) = self.matching_revision(&document).await {
            tracing::info!(revision, "remote definition unchanged");
            return Ok(RegisterOutcome::Unchanged { revision });
        }

        // Converted from the template as written, so user-defined map keys
        // under `tags`/`parameters`/`options` keep their case.
        let body = walk_keys(&rendered, to_camel_case);
        let registered = self
            .batch
            .register_job_definition(body)
            .await
            .context("failed to register job definition")?;

        tracing::info!(
            name = %registered.job_definition_name,
            revision = registered.revision,
            "registered job definition"
        );
        Ok(RegisterOutcome::Registered {
            name: registered.job_definition_name,
            revision: registered.revision,
        })
    }

    /// Revision of the latest ACTIVE definition equal to `document`.
    ///
    /// Lookup failures only mean the comparison is skipped.
    async fn matching_revision(&self, document: &Value) -> Option<i64> {
        let name = definition_name(document).ok()?;
        let definitions = match self.active_definitions(&name).await {
            Ok(definitions) => definitions,
            Err(e) => {
                tracing::warn!(error = %e, "could not compare with remote definition");
                return None;
            }
        };
        let latest = pick_latest_revision(&definitions)?;
        (normalize_remote_definition(latest) == *document).then_some(latest.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::batch::{MockBatchApi, MockLogsApi, RegisterJobDefinitionResponse};
    use crate::error::BatchaError;
    use serde_json::json;

    #[tokio::test]
    async fn test_dry_run_does_not_call_service() {
        let fx = fixture(TEMPLATE);
        let app = app(&fx, MockBatchApi::new(), MockLogsApi::new());

        let RegisterOutcome::DryRun(json) = app.register(true).await.unwrap() else {
            panic!("expected dry run");
        };
        assert!(json.starts_with("{\n  \"ContainerProperties\""));
        assert!(json.contains("\"Image\": \"busybox:latest\""));
    }

    #[tokio::test]
    async fn test_skips_when_remote_matches() {
        let fx = fixture(TEMPLATE);
        let mut batch = MockBatchApi::new();
        batch
            .expect_describe_job_definitions()
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    remote_definition(3, "busybox:old"),
                    remote_definition(4, "busybox:latest"),
                ])
            });
        batch.expect_register_job_definition().never();

        let app = app(&fx, batch, MockLogsApi::new());
        assert_eq!(
            app.register(false).await.unwrap(),
            RegisterOutcome::Unchanged { revision: 4 }
        );
    }

    #[tokio::test]
    async fn test_registers_camel_case_body_when_changed() {
        let fx = fixture(TEMPLATE);
        let mut batch = MockBatchApi::new();
        batch
            .expect_describe_job_definitions()
            .returning(|_, _| Ok(vec![remote_definition(4, "busybox:1.0")]));
        batch
            .expect_register_job_definition()
            .withf(|body: &Value| {
                body["jobDefinitionName"] == "hello"
                    && body["containerProperties"]["image"] == "busybox:latest"
                    && body["parameters"] == json!({"inputFile": "s3://bucket/in"})
            })
            .times(1)
            .returning(|_| {
                Ok(RegisterJobDefinitionResponse {
                    job_definition_name: "hello".into(),
                    job_definition_arn: "arn:aws:batch:us-east-1:123:job-definition/hello:5".into(),
                    revision: 5,
                })
            });

        let app = app(&fx, batch, MockLogsApi::new());
        assert_eq!(
            app.register(false).await.unwrap(),
            RegisterOutcome::Registered {
                name: "hello".into(),
                revision: 5
            }
        );
    }

    #[tokio::test]
    async fn test_user_defined_keys_keep_their_case() {
        let fx = fixture(
            r#"{
  "jobDefinitionName": "hello",
  "type": "container",
  "tags": {"Environment": "prod"},
  "parameters": {"InputFile": "x"},
  "containerProperties": {
    "image": "busybox",
    "logConfiguration": {"logDriver": "awslogs", "options": {"Awslogs-Group": "/batch"}}
  }
}"#,
        );
        let mut batch = MockBatchApi::new();
        batch
            .expect_describe_job_definitions()
            .returning(|_, _| Ok(vec![]));
        batch
            .expect_register_job_definition()
            .withf(|body: &Value| {
                body["tags"] == json!({"Environment": "prod"})
                    && body["parameters"] == json!({"InputFile": "x"})
                    && body["containerProperties"]["logConfiguration"]["options"]
                        == json!({"Awslogs-Group": "/batch"})
                    && body["containerProperties"]["image"] == "busybox"
            })
            .times(1)
            .returning(|_| {
                Ok(RegisterJobDefinitionResponse {
                    job_definition_name: "hello".into(),
                    job_definition_arn: String::new(),
                    revision: 1,
                })
            });

        let app = app(&fx, batch, MockLogsApi::new());
        assert!(matches!(
            app.register(false).await.unwrap(),
            RegisterOutcome::Registered { revision: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_describe_failure_still_registers() {
        let fx = fixture(TEMPLATE);
        let mut batch = MockBatchApi::new();
        batch
            .expect_describe_job_definitions()
            .returning(|_, _| Err(BatchaError::service("DescribeJobDefinitions", 500, "boom")));
        batch.expect_register_job_definition().times(1).returning(|_| {
            Ok(RegisterJobDefinitionResponse {
                job_definition_name: "hello".into(),
                job_definition_arn: String::new(),
                revision: 1,
            })
        });

        let app = app(&fx, batch, MockLogsApi::new());
        assert!(matches!(
            app.register(false).await.unwrap(),
            RegisterOutcome::Registered { revision: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_register_error_is_reported() {
        let fx = fixture(TEMPLATE);
        let mut batch = MockBatchApi::new();
        batch
            .expect_describe_job_definitions()
            .returning(|_, _| Ok(vec![]));
        batch
            .expect_register_job_definition()
            .returning(|_| Err(BatchaError::service("RegisterJobDefinition", 400, "bad image")));

        let app = app(&fx, batch, MockLogsApi::new());
        let err = app.register(false).await.unwrap_err();
        assert!(err.to_string().contains("failed to register job definition"));
        assert!(err.to_string().contains("bad image"));
    }
}
