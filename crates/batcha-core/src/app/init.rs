use super::App;
use crate::batch::{ACTIVE_STATUS, BatchApi, pick_latest_revision, prune_empty, strip_managed_fields};
use crate::casing::{to_camel_case, walk_keys};
use crate::config::Config;
use crate::error::{BatchaError, BatchaResult, ResultExt};
use std::path::{Path, PathBuf};

pub const DEFINITION_FILE_NAME: &str = "job-definition.json";
pub const CONFIG_FILE_NAME: &str = "batcha.yml";

/// Options for `init`
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub job_definition_name: String,
    pub region: String,
    pub output_dir: PathBuf,
}

/// Files written by `init`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOutcome {
    pub definition_path: PathBuf,
    pub config_path: PathBuf,
}

fn write_file(path: &Path, content: &str) -> BatchaResult<()> {
    std::fs::write(path, content).map_err(|e| {
        BatchaError::io_with_path(
            format!("failed to write {}: {}", path.display(), e),
            path.display().to_string(),
        )
    })
}

impl App {
    /// Bootstrap a config and template from a registered definition
    pub async fn init(options: &InitOptions, batch: &dyn BatchApi) -> BatchaResult<InitOutcome> {
        let name = &options.job_definition_name;
        if name.is_empty() {
            return Err(BatchaError::invalid_input_field(
                "job definition name is required",
                "job_definition_name",
            ));
        }

        let definitions = batch
            .describe_job_definitions(name, ACTIVE_STATUS)
            .await
            .context("failed to describe job definitions")?;
        let latest = pick_latest_revision(&definitions).ok_or_else(|| {
            BatchaError::not_found_resource(
                format!("no active job definition found for {:?}", name),
                "job definition",
            )
        })?;
        tracing::debug!(arn = %latest.arn, "initializing from job definition");

        let template = walk_keys(
            &prune_empty(&strip_managed_fields(&latest.raw)),
            to_camel_case,
        );
        let mut definition_json = serde_json::to_string_pretty(&template)?;
        definition_json.push('\n');

        let config = Config {
            region: options.region.clone(),
            job_definition: DEFINITION_FILE_NAME.to_string(),
            ..Default::default()
        };
        let config_yaml = serde_yaml::to_string(&config)?;

        let definition_path = options.output_dir.join(DEFINITION_FILE_NAME);
        write_file(&definition_path, &definition_json)?;
        let config_path = options.output_dir.join(CONFIG_FILE_NAME);
        write_file(&config_path, &config_yaml)?;

        Ok(InitOutcome {
            definition_path,
            config_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::remote_definition;
    use super::*;
    use crate::batch::MockBatchApi;
    use crate::config::load_from_file;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_writes_template_and_config() {
        let dir = TempDir::new().unwrap();
        let mut batch = MockBatchApi::new();
        batch
            .expect_describe_job_definitions()
            .withf(|name: &str, status: &str| name == "hello" && status == "ACTIVE")
            .returning(|_, _| Ok(vec![remote_definition(2, "busybox:2"), remote_definition(1, "busybox:1")]));

        let options = InitOptions {
            job_definition_name: "hello".into(),
            region: "ap-northeast-1".into(),
            output_dir: dir.path().to_path_buf(),
        };
        let outcome = App::init(&options, &batch).await.unwrap();
        assert_eq!(outcome.definition_path, dir.path().join("job-definition.json"));

        let written = std::fs::read_to_string(&outcome.definition_path).unwrap();
        assert!(written.ends_with("}\n"));
        let template: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(
            template,
            json!({
                "jobDefinitionName": "hello",
                "type": "container",
                "parameters": {"inputFile": "s3://bucket/in"},
                "containerProperties": {
                    "image": "busybox:2",
                    "command": ["echo", "Ref::inputFile"]
                }
            })
        );

        let config = load_from_file(&outcome.config_path).unwrap();
        assert_eq!(config.region, "ap-northeast-1");
        assert_eq!(config.job_definition, "job-definition.json");
        assert!(config.plugins.is_empty());
    }

    #[tokio::test]
    async fn test_init_without_active_definition() {
        let dir = TempDir::new().unwrap();
        let mut batch = MockBatchApi::new();
        batch
            .expect_describe_job_definitions()
            .returning(|_, _| Ok(vec![]));

        let options = InitOptions {
            job_definition_name: "missing".into(),
            region: "us-east-1".into(),
            output_dir: dir.path().to_path_buf(),
        };
        let err = App::init(&options, &batch).await.unwrap_err();
        assert_eq!(err.to_string(), "no active job definition found for \"missing\"");
        assert!(!dir.path().join("batcha.yml").exists());
    }
}
