use super::{App, definition_name};
use crate::batch::{normalize_remote_definition, pick_latest_revision};
use crate::diff::TextDiff;
use crate::error::BatchaResult;

/// Result of comparing the local definition with the latest remote revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOutcome {
    NoDifferences,
    /// Nothing is registered under this name yet
    NewDefinition { name: String, local: String },
    /// Unified diff from `remote` to `local`
    Changed {
        unified: String,
        added: usize,
        removed: usize,
    },
}

impl DiffOutcome {
    pub fn has_differences(&self) -> bool {
        !matches!(self, DiffOutcome::NoDifferences)
    }
}

impl App {
    pub async fn diff(&self) -> BatchaResult<DiffOutcome> {
        let document = self.canonical_document().await?;
        let local = serde_json::to_string_pretty(&document)?;
        let name = definition_name(&document)?;

        let definitions = self.active_definitions(&name).await?;
        let Some(latest) = pick_latest_revision(&definitions) else {
            return Ok(DiffOutcome::NewDefinition { name, local });
        };

        let remote = serde_json::to_string_pretty(&normalize_remote_definition(latest))?;
        let diff = TextDiff::compute(&remote, &local);
        if !diff.has_changes() {
            return Ok(DiffOutcome::NoDifferences);
        }
        Ok(DiffOutcome::Changed {
            unified: diff.format_unified("remote", "local"),
            added: diff.added_count(),
            removed: diff.removed_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::batch::{MockBatchApi, MockLogsApi};

    #[tokio::test]
    async fn test_no_differences() {
        let fx = fixture(TEMPLATE);
        let mut batch = MockBatchApi::new();
        batch
            .expect_describe_job_definitions()
            .withf(|name: &str, status: &str| name == "hello" && status == "ACTIVE")
            .returning(|_, _| Ok(vec![remote_definition(2, "busybox:latest")]));

        let app = app(&fx, batch, MockLogsApi::new());
        let outcome = app.diff().await.unwrap();
        assert_eq!(outcome, DiffOutcome::NoDifferences);
        assert!(!outcome.has_differences());
    }

    #[tokio::test]
    async fn test_image_change_is_reported() {
        let fx = fixture(TEMPLATE);
        let mut batch = MockBatchApi::new();
        batch
            .expect_describe_job_definitions()
            .returning(|_, _| Ok(vec![remote_definition(2, "busybox:1.36")]));

        let app = app(&fx, batch, MockLogsApi::new());
        let DiffOutcome::Changed {
            unified: diff,
            added,
            removed,
        } = app.diff().await.unwrap()
        else {
            panic!("expected a diff");
        };
        assert_eq!((added, removed), (1, 1));
        assert!(diff.starts_with("--- remote\n+++ local\n@@ "));
        assert!(diff.contains("\n-    \"Image\": \"busybox:1.36\"\n"));
        assert!(diff.contains("\n+    \"Image\": \"busybox:latest\"\n"));
    }

    #[tokio::test]
    async fn test_new_definition() {
        let fx = fixture(TEMPLATE);
        let mut batch = MockBatchApi::new();
        batch
            .expect_describe_job_definitions()
            .returning(|_, _| Ok(vec![]));

        let app = app(&fx, batch, MockLogsApi::new());
        match app.diff().await.unwrap() {
            DiffOutcome::NewDefinition { name, local } => {
                assert_eq!(name, "hello");
                assert!(local.contains("\"JobDefinitionName\": \"hello\""));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_name_required() {
        let fx = fixture(r#"{"type": "container"}"#);
        let app = app(&fx, MockBatchApi::new(), MockLogsApi::new());
        let err = app.diff().await.unwrap_err();
        assert!(err.to_string().contains("jobDefinitionName is required"));
    }
}
