use super::{App, definition_name};
use crate::batch::{JobDefinition, pick_latest_revision};
use crate::error::BatchaResult;

/// Latest active revision and how many revisions are active
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub name: String,
    pub latest: Option<JobDefinition>,
    pub active_revisions: usize,
}

impl App {
    pub async fn status(&self) -> BatchaResult<StatusReport> {
        let document = self.canonical_document().await?;
        let name = definition_name(&document)?;
        let definitions = self.active_definitions(&name).await?;

        Ok(StatusReport {
            latest: pick_latest_revision(&definitions).cloned(),
            active_revisions: definitions.len(),
            name,
        })
    }
}
