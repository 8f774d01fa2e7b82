//! Terraform state lookups for templates
//!
//! Resolves addresses such as `aws_iam_role.batch.arn`,
//! `module.net.aws_subnet.private[1].id`, `data.aws_caller_identity.me.account_id`
//! or `output.queue_arn` against a version 4 state document.

use crate::error::{BatchaError, BatchaResult};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
struct StateDocument {
    #[serde(default)]
    outputs: Map<String, Value>,
    #[serde(default)]
    resources: Vec<StateResource>,
}

#[derive(Debug, Clone, Deserialize)]
struct StateResource {
    #[serde(default)]
    module: Option<String>,
    #[serde(default = "default_mode")]
    mode: String,
    #[serde(rename = "type")]
    resource_type: String,
    name: String,
    #[serde(default)]
    instances: Vec<StateInstance>,
}

#[derive(Debug, Clone, Deserialize)]
struct StateInstance {
    #[serde(default)]
    index_key: Option<Value>,
    #[serde(default)]
    attributes: Value,
}

fn default_mode() -> String {
    "managed".to_string()
}

/// Index applied to a resource or attribute segment
#[derive(Debug, Clone, PartialEq)]
enum IndexKey {
    Number(u64),
    Key(String),
}

impl IndexKey {
    fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (IndexKey::Number(n), Value::Number(v)) => v.as_u64() == Some(*n),
            (IndexKey::Key(k), Value::String(v)) => k == v,
            _ => false,
        }
    }

    fn render(&self) -> String {
        match self {
            IndexKey::Number(n) => format!("[{}]", n),
            IndexKey::Key(k) => format!("[\"{}\"]", k),
        }
    }
}

/// One dot-separated address segment with its trailing indices
#[derive(Debug, Clone, PartialEq)]
struct Segment {
    name: String,
    indices: Vec<IndexKey>,
}

/// Loaded Terraform state
#[derive(Debug, Clone, Default)]
pub struct TfState {
    doc: StateDocument,
}

impl TfState {
    /// Parse a state document
    pub fn from_json(content: &str) -> BatchaResult<Self> {
        let doc: StateDocument = serde_json::from_str(content)
            .map_err(|e| BatchaError::template(format!("failed to parse tfstate: {}", e)))?;
        Ok(Self { doc })
    }

    /// Load state from a local path, `file://` URL or `http(s)://` URL
    pub async fn load(url: &str) -> BatchaResult<Self> {
        let content = if url.starts_with("http://") || url.starts_with("https://") {
            let response = reqwest::get(url).await?;
            if !response.status().is_success() {
                return Err(BatchaError::template(format!(
                    "failed to load tfstate from {}: status {}",
                    url,
                    response.status()
                )));
            }
            response.text().await?
        } else if let Some(path) = url.strip_prefix("file://") {
            read_local(Path::new(path)).await?
        } else if url.contains("://") {
            return Err(BatchaError::template(format!(
                "unsupported tfstate location: {}",
                url
            )));
        } else {
            read_local(Path::new(url)).await?
        };
        tracing::debug!(url, "loaded tfstate");
        Self::from_json(&content)
    }

    /// Look up an address and render it as text.
    ///
    /// Strings are returned raw, other values as compact JSON.
    pub fn lookup(&self, address: &str) -> BatchaResult<String> {
        let value = self.resolve(address)?;
        Ok(match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    fn resolve(&self, address: &str) -> BatchaResult<&Value> {
        let not_found = || {
            BatchaError::not_found_resource(
                format!("tfstate address {:?} not found", address),
                "tfstate",
            )
        };

        let segments = parse_segments(address)?;
        let mut rest = segments.as_slice();

        if rest
            .first()
            .is_some_and(|s| s.name == "output" && s.indices.is_empty())
        {
            let name = rest.get(1).ok_or_else(not_found)?;
            let output = self.doc.outputs.get(&name.name).ok_or_else(not_found)?;
            let value = output.get("value").ok_or_else(not_found)?;
            let value = apply_indices(value, &name.indices).ok_or_else(not_found)?;
            return walk_attributes(value, &rest[2..]).ok_or_else(not_found);
        }

        let mut module_parts = Vec::new();
        while rest.len() > 1 && rest[0].name == "module" && rest[0].indices.is_empty() {
            let module = &rest[1];
            module_parts.push(format!(
                "module.{}{}",
                module.name,
                module.indices.iter().map(IndexKey::render).collect::<String>()
            ));
            rest = &rest[2..];
        }
        let module = (!module_parts.is_empty()).then(|| module_parts.join("."));

        let mode = match rest.first() {
            Some(s) if s.name == "data" && s.indices.is_empty() => {
                rest = &rest[1..];
                "data"
            }
            _ => "managed",
        };

        let (resource_type, name) = match rest {
            [t, n, ..] if t.indices.is_empty() => (t, n),
            _ => return Err(not_found()),
        };
        let attributes = &rest[2..];

        let resource = self
            .doc
            .resources
            .iter()
            .find(|r| {
                r.mode == mode
                    && r.resource_type == resource_type.name
                    && r.name == name.name
                    && r.module == module
            })
            .ok_or_else(not_found)?;

        let (instance_key, attr_indices) = match name.indices.split_first() {
            Some((key, more)) => (Some(key), more),
            None => (None, &[][..]),
        };
        let instance = match instance_key {
            Some(key) => resource
                .instances
                .iter()
                .find(|i| i.index_key.as_ref().is_some_and(|v| key.matches(v))),
            None => resource.instances.first(),
        }
        .ok_or_else(not_found)?;

        let value = apply_indices(&instance.attributes, attr_indices).ok_or_else(not_found)?;
        walk_attributes(value, attributes).ok_or_else(not_found)
    }
}

async fn read_local(path: &Path) -> BatchaResult<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        BatchaError::io_with_path(
            format!("failed to read tfstate: {}", e),
            path.display().to_string(),
        )
    })
}

fn walk_attributes<'a>(mut value: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    for segment in segments {
        value = value.get(&segment.name)?;
        value = apply_indices(value, &segment.indices)?;
    }
    Some(value)
}

fn apply_indices<'a>(mut value: &'a Value, indices: &[IndexKey]) -> Option<&'a Value> {
    for index in indices {
        value = match index {
            IndexKey::Number(n) => value.get(usize::try_from(*n).ok()?)?,
            IndexKey::Key(k) => value.get(k)?,
        };
    }
    Some(value)
}

/// Split an address on dots that are outside brackets
fn parse_segments(address: &str) -> BatchaResult<Vec<Segment>> {
    let invalid = || BatchaError::template(format!("invalid tfstate address {:?}", address));

    let mut segments = Vec::new();
    let mut chars = address.chars();
    let mut current = Segment {
        name: String::new(),
        indices: Vec::new(),
    };

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if current.name.is_empty() {
                    return Err(invalid());
                }
                segments.push(std::mem::replace(
                    &mut current,
                    Segment {
                        name: String::new(),
                        indices: Vec::new(),
                    },
                ));
            }
            '[' => {
                let mut raw = String::new();
                let mut quoted = false;
                let mut was_quoted = false;
                loop {
                    match chars.next() {
                        Some('"') => {
                            quoted = !quoted;
                            was_quoted = true;
                        }
                        Some(']') if !quoted => break,
                        Some(ch) => raw.push(ch),
                        None => return Err(invalid()),
                    }
                }
                let key = if was_quoted {
                    IndexKey::Key(raw)
                } else {
                    raw.parse::<u64>().map(IndexKey::Number).map_err(|_| invalid())?
                };
                current.indices.push(key);
            }
            _ if !current.indices.is_empty() => return Err(invalid()),
            _ => current.name.push(c),
        }
    }

    if current.name.is_empty() {
        return Err(invalid());
    }
    segments.push(current);
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATE: &str = r#"{
      "version": 4,
      "outputs": {
        "queue_arn": {"value": "arn:aws:batch:us-east-1:123:job-queue/q", "type": "string"},
        "subnets": {"value": ["subnet-a", "subnet-b"], "type": ["list", "string"]}
      },
      "resources": [
        {
          "mode": "managed",
          "type": "aws_iam_role",
          "name": "batch",
          "instances": [
            {"attributes": {"arn": "arn:aws:iam::123:role/batch", "name": "batch", "max_session_duration": 3600}}
          ]
        },
        {
          "mode": "data",
          "type": "aws_caller_identity",
          "name": "current",
          "instances": [{"attributes": {"account_id": "123456789012"}}]
        },
        {
          "module": "module.network",
          "mode": "managed",
          "type": "aws_subnet",
          "name": "private",
          "instances": [
            {"index_key": 0, "attributes": {"id": "subnet-0"}},
            {"index_key": 1, "attributes": {"id": "subnet-1"}}
          ]
        },
        {
          "mode": "managed",
          "type": "aws_ecr_repository",
          "name": "repo",
          "instances": [
            {"index_key": "app", "attributes": {"repository_url": "123.dkr.ecr/app", "tags": {"env": "prod"}}}
          ]
        }
      ]
    }"#;

    fn state() -> TfState {
        TfState::from_json(STATE).unwrap()
    }

    #[test]
    fn test_lookup_managed_resource() {
        assert_eq!(
            state().lookup("aws_iam_role.batch.arn").unwrap(),
            "arn:aws:iam::123:role/batch"
        );
        assert_eq!(
            state().lookup("aws_iam_role.batch.max_session_duration").unwrap(),
            "3600"
        );
    }

    #[test]
    fn test_lookup_data_source() {
        assert_eq!(
            state().lookup("data.aws_caller_identity.current.account_id").unwrap(),
            "123456789012"
        );
    }

    #[test]
    fn test_lookup_module_with_index() {
        assert_eq!(
            state().lookup("module.network.aws_subnet.private[1].id").unwrap(),
            "subnet-1"
        );
        // Without an index the first instance is used
        assert_eq!(
            state().lookup("module.network.aws_subnet.private.id").unwrap(),
            "subnet-0"
        );
    }

    #[test]
    fn test_lookup_string_index_and_nested_attribute() {
        assert_eq!(
            state().lookup(r#"aws_ecr_repository.repo["app"].repository_url"#).unwrap(),
            "123.dkr.ecr/app"
        );
        assert_eq!(
            state().lookup(r#"aws_ecr_repository.repo["app"].tags.env"#).unwrap(),
            "prod"
        );
    }

    #[test]
    fn test_lookup_outputs() {
        assert_eq!(
            state().lookup("output.queue_arn").unwrap(),
            "arn:aws:batch:us-east-1:123:job-queue/q"
        );
        assert_eq!(state().lookup("output.subnets[1]").unwrap(), "subnet-b");
        assert_eq!(
            state().lookup("output.subnets").unwrap(),
            r#"["subnet-a","subnet-b"]"#
        );
    }

    #[test]
    fn test_lookup_missing() {
        let err = state().lookup("aws_iam_role.missing.arn").unwrap_err();
        assert!(err.to_string().contains("aws_iam_role.missing.arn"));
        assert!(state().lookup("aws_iam_role.batch.nope").is_err());
        assert!(state().lookup("module.network.aws_subnet.private[5].id").is_err());
        // Module resources are not visible from the root module
        assert!(state().lookup("aws_subnet.private.id").is_err());
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(parse_segments("").is_err());
        assert!(parse_segments("a..b").is_err());
        assert!(parse_segments("a[0").is_err());
        assert!(parse_segments("a[0]b").is_err());
        assert_eq!(
            parse_segments(r#"a["x.y"].b"#).unwrap(),
            vec![
                Segment {
                    name: "a".into(),
                    indices: vec![IndexKey::Key("x.y".into())],
                },
                Segment {
                    name: "b".into(),
                    indices: vec![],
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_load_local_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("terraform.tfstate");
        std::fs::write(&path, STATE).unwrap();

        let state = TfState::load(path.to_str().unwrap()).await.unwrap();
        assert_eq!(state.lookup("aws_iam_role.batch.name").unwrap(), "batch");

        let url = format!("file://{}", path.display());
        let state = TfState::load(&url).await.unwrap();
        assert_eq!(state.lookup("aws_iam_role.batch.name").unwrap(), "batch");

        assert!(TfState::load("s3://bucket/terraform.tfstate").await.is_err());
    }
}
