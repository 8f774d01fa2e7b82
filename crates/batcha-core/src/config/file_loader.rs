//! File-based configuration loading

use super::env_loader::apply_env_fallbacks;
use super::model::Config;
use crate::error::{BatchaError, BatchaResult};
use std::fs;
use std::path::Path;

/// Parse a configuration file without environment fallbacks.
///
/// YAML by default; `.json` files are parsed as JSON.
pub fn load_from_file(path: &Path) -> BatchaResult<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        BatchaError::config_with_context(
            format!("failed to read config: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let config: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| {
            BatchaError::config_with_context(
                format!("failed to parse config: {}", e),
                format!("Deserializing JSON configuration from '{}'", path.display()),
            )
        })?,
        _ => serde_yaml::from_str(&content).map_err(|e| {
            BatchaError::config_with_context(
                format!("failed to parse config: {}", e),
                format!("Deserializing YAML configuration from '{}'", path.display()),
            )
        })?,
    };

    Ok(config)
}

/// Load, apply environment fallbacks from the process environment, and validate
pub fn load_config(path: &Path) -> BatchaResult<Config> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load with a custom environment source
pub fn load_config_with_env<F>(path: &Path, lookup: F) -> BatchaResult<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = load_from_file(path)?;
    config.validate()?;
    apply_env_fallbacks(&mut config, lookup);
    tracing::debug!(path = %path.display(), region = %config.region, "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_load_from_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("batcha.yml");
        let yaml_content = r#"
region: ap-northeast-1
job_definition: job-definition.json
job_queue: default-queue
plugins:
  - name: tfstate
    config:
      url: ./terraform.tfstate
"#;
        fs::write(&config_path, yaml_content).unwrap();

        let config = load_config_with_env(&config_path, no_env).unwrap();
        assert_eq!(config.region, "ap-northeast-1");
        assert_eq!(config.job_definition, "job-definition.json");
        assert_eq!(config.job_queue.as_deref(), Some("default-queue"));
        assert_eq!(config.plugins.len(), 1);
        assert_eq!(config.plugins[0].name, "tfstate");
        assert_eq!(config.plugins[0].config.url, "./terraform.tfstate");
    }

    #[test]
    fn test_load_from_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("batcha.json");
        fs::write(
            &config_path,
            r#"{"region": "us-west-2", "job_definition": "job.json"}"#,
        )
        .unwrap();

        let config = load_config_with_env(&config_path, no_env).unwrap();
        assert_eq!(config.region, "us-west-2");
    }

    #[test]
    fn test_missing_job_definition() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("batcha.yml");
        fs::write(&config_path, "region: us-east-1\n").unwrap();

        let err = load_config_with_env(&config_path, no_env).unwrap_err();
        assert!(err.to_string().contains("job_definition is required"));
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_config_with_env(&temp_dir.path().join("nope.yml"), no_env).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn test_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("batcha.yml");
        fs::write(&config_path, "region: [unterminated\n").unwrap();

        let err = load_config_with_env(&config_path, no_env).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn test_region_from_env() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("batcha.yml");
        fs::write(&config_path, "job_definition: job.json\n").unwrap();

        let config = load_config_with_env(&config_path, |key| {
            (key == "AWS_DEFAULT_REGION").then(|| "eu-central-1".to_string())
        })
        .unwrap();
        assert_eq!(config.region, "eu-central-1");
    }
}
