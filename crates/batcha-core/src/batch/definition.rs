//! Helpers over job definitions and jobs

use super::types::{JobDefinition, JobDetail};
use crate::casing::{to_pascal_case, walk_keys};
use crate::error::{BatchaError, BatchaResult};
use serde_json::Value;

/// Fields the service sets on a registered definition
pub const MANAGED_FIELDS: [&str; 4] = [
    "jobDefinitionArn",
    "revision",
    "status",
    "containerOrchestrationType",
];

const DEFAULT_LOG_GROUP: &str = "/aws/batch/job";
const LOG_GROUP_OPTION: &str = "awslogs-group";

/// Highest revision; the first one wins on ties
pub fn pick_latest_revision(definitions: &[JobDefinition]) -> Option<&JobDefinition> {
    definitions.iter().fold(None, |latest, def| match latest {
        Some(current) if current.revision >= def.revision => Some(current),
        _ => Some(def),
    })
}

/// Remove nulls, empty objects and empty arrays, recursively.
///
/// The service echoes unset collections back as `[]` or `{}`; dropping them
/// keeps them out of comparisons with a hand-written document.
pub fn prune_empty(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter_map(|(k, v)| {
                    let pruned = prune_empty(v);
                    (!is_empty(&pruned)).then(|| (k.clone(), pruned))
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(prune_empty)
                .filter(|v| !v.is_null())
                .collect(),
        ),
        other => other.clone(),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Remove service-managed top-level fields from a service document
pub fn strip_managed_fields(raw: &Value) -> Value {
    let mut doc = raw.clone();
    if let Value::Object(map) = &mut doc {
        for field in MANAGED_FIELDS {
            map.remove(field);
        }
    }
    doc
}

/// Remote definition in the same shape as a rendered local document
pub fn normalize_remote_definition(definition: &JobDefinition) -> Value {
    let stripped = strip_managed_fields(&definition.raw);
    walk_keys(&prune_empty(&stripped), to_pascal_case)
}

/// Whether `arn` names a revision of the definition `name`
pub fn matches_job_definition(arn: &str, name: &str) -> bool {
    let Some((_, tail)) = arn.rsplit_once("job-definition/") else {
        return false;
    };
    let def_name = tail.rsplit_once(':').map_or(tail, |(n, _)| n);
    def_name == name
}

/// Log group and stream of a job's container
pub fn extract_log_info(job: &JobDetail) -> BatchaResult<(String, String)> {
    let container = job.container.as_ref();

    let stream = container
        .and_then(|c| c.log_stream_name.as_deref())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            BatchaError::not_found_resource(
                format!(
                    "no log stream for job {} (status {}); it may not have started yet",
                    job.job_id, job.status
                ),
                "log stream",
            )
        })?;

    let group = container
        .and_then(|c| c.log_configuration.as_ref())
        .and_then(|lc| lc.options.get(LOG_GROUP_OPTION))
        .filter(|g| !g.is_empty())
        .map_or(DEFAULT_LOG_GROUP, String::as_str);

    Ok((group.to_string(), stream.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::types::{ContainerDetail, JobStatus, LogConfiguration};
    use serde_json::json;
    use std::collections::HashMap;

    fn definition(revision: i64, raw: Value) -> JobDefinition {
        JobDefinition {
            name: "hello".into(),
            arn: format!("arn:aws:batch:us-east-1:1:job-definition/hello:{}", revision),
            revision,
            status: "ACTIVE".into(),
            definition_type: "container".into(),
            container_properties: None,
            raw,
        }
    }

    fn job(container: Option<ContainerDetail>) -> JobDetail {
        JobDetail {
            job_id: "job-1".into(),
            job_name: "hello".into(),
            status: JobStatus::Runnable,
            status_reason: None,
            job_definition: None,
            container,
        }
    }

    #[test]
    fn test_pick_latest_revision() {
        assert!(pick_latest_revision(&[]).is_none());

        let defs = vec![
            definition(2, json!({"tag": "a"})),
            definition(5, json!({"tag": "b"})),
            definition(5, json!({"tag": "c"})),
            definition(1, json!({"tag": "d"})),
        ];
        let latest = pick_latest_revision(&defs).unwrap();
        assert_eq!(latest.revision, 5);
        assert_eq!(latest.raw["tag"], "b");
    }

    #[test]
    fn test_prune_empty() {
        let value = json!({
            "a": null,
            "b": [],
            "c": {},
            "d": {"e": [], "f": null},
            "g": [1, null, {"h": null}],
            "i": false,
            "j": 0,
            "k": ""
        });
        assert_eq!(
            prune_empty(&value),
            json!({"g": [1, {}], "i": false, "j": 0, "k": ""})
        );
    }

    #[test]
    fn test_normalize_remote_definition() {
        let raw = json!({
            "jobDefinitionName": "hello",
            "jobDefinitionArn": "arn:aws:batch:us-east-1:1:job-definition/hello:4",
            "revision": 4,
            "status": "ACTIVE",
            "containerOrchestrationType": "ECS",
            "type": "container",
            "tags": {},
            "parameters": {"inputFile": "s3://x"},
            "containerProperties": {
                "image": "busybox",
                "mountPoints": [],
                "environment": [{"name": "A", "value": "1"}]
            }
        });
        let normalized = normalize_remote_definition(&definition(4, raw));
        assert_eq!(
            normalized,
            json!({
                "JobDefinitionName": "hello",
                "Type": "container",
                "Parameters": {"inputFile": "s3://x"},
                "ContainerProperties": {
                    "Image": "busybox",
                    "Environment": [{"Name": "A", "Value": "1"}]
                }
            })
        );
    }

    #[test]
    fn test_matches_job_definition() {
        let arn = "arn:aws:batch:us-east-1:123:job-definition/my-job:7";
        assert!(matches_job_definition(arn, "my-job"));
        assert!(!matches_job_definition(arn, "my"));
        assert!(!matches_job_definition(arn, "job"));
        assert!(matches_job_definition("job-definition/solo", "solo"));
        assert!(!matches_job_definition("my-job", "my-job"));
    }

    #[test]
    fn test_extract_log_info_default_group() {
        let detail = job(Some(ContainerDetail {
            log_stream_name: Some("hello/default/abc".into()),
            log_configuration: None,
        }));
        let (group, stream) = extract_log_info(&detail).unwrap();
        assert_eq!(group, "/aws/batch/job");
        assert_eq!(stream, "hello/default/abc");
    }

    #[test]
    fn test_extract_log_info_custom_group() {
        let mut options = HashMap::new();
        options.insert("awslogs-group".to_string(), "/custom/group".to_string());
        let detail = job(Some(ContainerDetail {
            log_stream_name: Some("s".into()),
            log_configuration: Some(LogConfiguration {
                log_driver: Some("awslogs".into()),
                options,
            }),
        }));
        let (group, _) = extract_log_info(&detail).unwrap();
        assert_eq!(group, "/custom/group");
    }

    #[test]
    fn test_extract_log_info_missing_stream() {
        let err = extract_log_info(&job(None)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("job-1"));
        assert!(msg.contains("RUNNABLE"));
    }
}
