//! Local validation of a job definition document
//!
//! Runs entirely offline against the canonical (PascalCase) document.

use crate::error::{BatchaError, BatchaResult};
use serde::Deserialize;
use serde_json::Value;

const FARGATE: &str = "FARGATE";

/// Allowed Fargate memory (MiB) per VCPU value, as `(vcpu, min, max, step)`
pub const FARGATE_MEMORY_RANGES: [(&str, u32, u32, u32); 7] = [
    ("0.25", 512, 2048, 512),
    ("0.5", 1024, 4096, 1024),
    ("1", 2048, 8192, 1024),
    ("2", 4096, 16384, 1024),
    ("4", 8192, 30720, 1024),
    ("8", 16384, 61440, 4096),
    ("16", 32768, 122880, 8192),
];

/// Registration input as the service would accept it
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterJobDefinitionInput {
    #[serde(default)]
    pub job_definition_name: Option<String>,
    #[serde(rename = "Type", default)]
    pub definition_type: Option<String>,
    #[serde(default)]
    pub platform_capabilities: Vec<String>,
    #[serde(default)]
    pub container_properties: Option<ContainerPropertiesInput>,
    #[serde(default)]
    pub node_properties: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerPropertiesInput {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub execution_role_arn: Option<String>,
    #[serde(default)]
    pub resource_requirements: Vec<ResourceRequirementInput>,
    #[serde(default)]
    pub environment: Vec<KeyValuePair>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceRequirementInput {
    #[serde(rename = "Type", default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyValuePair {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl RegisterJobDefinitionInput {
    /// Decode a canonical document; fails when field types do not fit
    pub fn from_document(document: &Value) -> BatchaResult<Self> {
        serde_json::from_value(document.clone()).map_err(|e| {
            BatchaError::json(format!(
                "document is not a valid RegisterJobDefinitionInput: {}",
                e
            ))
        })
    }

    pub fn is_fargate(&self) -> bool {
        self.platform_capabilities.iter().any(|pc| pc == FARGATE)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

/// Collect every problem with the input; empty means valid
pub fn validate_input(input: &RegisterJobDefinitionInput) -> Vec<String> {
    let mut errors = Vec::new();

    if is_blank(&input.job_definition_name) {
        errors.push("jobDefinitionName is required".to_string());
    }

    let definition_type = input.definition_type.as_deref().unwrap_or_default();
    if definition_type.is_empty() {
        errors.push("type is required".to_string());
    }

    match definition_type {
        "container" => errors.extend(validate_container_properties(
            input.container_properties.as_ref(),
            input.is_fargate(),
        )),
        "multinode" if input.node_properties.is_none() => {
            errors.push("nodeProperties is required when type is \"multinode\"".to_string());
        }
        _ => {}
    }

    errors
}

pub fn validate_container_properties(
    properties: Option<&ContainerPropertiesInput>,
    is_fargate: bool,
) -> Vec<String> {
    let Some(cp) = properties else {
        return vec!["containerProperties is required when type is \"container\"".to_string()];
    };

    let mut errors = Vec::new();

    if is_blank(&cp.image) {
        errors.push("containerProperties.image is required".to_string());
    }

    if is_fargate && is_blank(&cp.execution_role_arn) {
        errors.push("containerProperties.executionRoleArn is required for Fargate".to_string());
    }

    let mut vcpu = "";
    let mut memory = "";
    for requirement in &cp.resource_requirements {
        let value = requirement.value.as_deref().unwrap_or_default();
        match requirement.resource_type.as_deref() {
            Some("VCPU") => vcpu = value,
            Some("MEMORY") => memory = value,
            _ => {}
        }
    }

    if vcpu.is_empty() {
        errors.push("containerProperties.resourceRequirements must include VCPU".to_string());
    } else if vcpu.parse::<f64>().is_err() {
        errors.push(format!("VCPU value {:?} is not a valid number", vcpu));
    }

    if memory.is_empty() {
        errors.push("containerProperties.resourceRequirements must include MEMORY".to_string());
    } else if memory.parse::<i64>().is_err() {
        errors.push(format!("MEMORY value {:?} is not a valid integer", memory));
    }

    if is_fargate && !vcpu.is_empty() && !memory.is_empty() {
        errors.extend(validate_fargate_resources(vcpu, memory));
    }

    for (i, env) in cp.environment.iter().enumerate() {
        if is_blank(&env.name) {
            errors.push(format!(
                "containerProperties.environment[{}].name must not be empty",
                i
            ));
        }
    }

    errors
}

/// Check a VCPU/MEMORY pair against the Fargate size table
pub fn validate_fargate_resources(vcpu: &str, memory: &str) -> Option<String> {
    let Some(&(_, min, max, step)) = FARGATE_MEMORY_RANGES.iter().find(|(v, ..)| *v == vcpu) else {
        let allowed: Vec<&str> = FARGATE_MEMORY_RANGES.iter().map(|(v, ..)| *v).collect();
        return Some(format!(
            "Fargate VCPU {:?} is not valid (allowed: {})",
            vcpu,
            allowed.join(", ")
        ));
    };

    // Unparseable memory is reported by the caller
    let mem: i64 = memory.parse().ok()?;
    let (min, max, step) = (i64::from(min), i64::from(max), i64::from(step));

    if mem < min || mem > max {
        return Some(format!(
            "Fargate MEMORY {} is out of range for VCPU {} (allowed: {}-{} MiB)",
            mem, vcpu, min, max
        ));
    }
    if (mem - min) % step != 0 {
        return Some(format!(
            "Fargate MEMORY {} must be a multiple of {} (starting from {}) for VCPU {}",
            mem, step, min, vcpu
        ));
    }
    None
}

/// Validate a canonical document, failing with every collected message
pub fn verify_document(document: &Value) -> BatchaResult<()> {
    let input = RegisterJobDefinitionInput::from_document(document)?;
    let errors = validate_input(&input);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(BatchaError::validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn container_input(platform: &str, vcpu: &str, memory: &str) -> RegisterJobDefinitionInput {
        RegisterJobDefinitionInput::from_document(&json!({
            "JobDefinitionName": "test",
            "Type": "container",
            "PlatformCapabilities": [platform],
            "ContainerProperties": {
                "Image": "busybox",
                "ExecutionRoleArn": "arn:aws:iam::123:role/exec",
                "ResourceRequirements": [
                    {"Type": "VCPU", "Value": vcpu},
                    {"Type": "MEMORY", "Value": memory}
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_container_definition() {
        let input = container_input("FARGATE", "1", "2048");
        assert!(validate_input(&input).is_empty());
        assert!(input.is_fargate());
    }

    #[test]
    fn test_missing_name_and_type() {
        let input = RegisterJobDefinitionInput::from_document(&json!({})).unwrap();
        let errors = validate_input(&input);
        assert_eq!(errors, vec!["jobDefinitionName is required", "type is required"]);
    }

    #[test]
    fn test_missing_container_properties() {
        let input = RegisterJobDefinitionInput::from_document(&json!({
            "JobDefinitionName": "test",
            "Type": "container"
        }))
        .unwrap();
        assert_eq!(
            validate_input(&input),
            vec!["containerProperties is required when type is \"container\""]
        );
    }

    #[test]
    fn test_missing_image_and_resources() {
        let input = RegisterJobDefinitionInput::from_document(&json!({
            "JobDefinitionName": "test",
            "Type": "container",
            "ContainerProperties": {"Environment": [{"Name": "", "Value": "x"}, {"Name": "OK"}]}
        }))
        .unwrap();
        let errors = validate_input(&input);
        assert_eq!(
            errors,
            vec![
                "containerProperties.image is required",
                "containerProperties.resourceRequirements must include VCPU",
                "containerProperties.resourceRequirements must include MEMORY",
                "containerProperties.environment[0].name must not be empty",
            ]
        );
    }

    #[test]
    fn test_fargate_requires_execution_role() {
        let mut input = container_input("FARGATE", "1", "2048");
        if let Some(cp) = input.container_properties.as_mut() {
            cp.execution_role_arn = None;
        }
        assert_eq!(
            validate_input(&input),
            vec!["containerProperties.executionRoleArn is required for Fargate"]
        );
    }

    #[test]
    fn test_fargate_invalid_vcpu() {
        let errors = validate_input(&container_input("FARGATE", "3", "2048"));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0],
            "Fargate VCPU \"3\" is not valid (allowed: 0.25, 0.5, 1, 2, 4, 8, 16)"
        );
    }

    #[test]
    fn test_fargate_memory_out_of_range() {
        let errors = validate_input(&container_input("FARGATE", "1", "512"));
        assert_eq!(
            errors,
            vec!["Fargate MEMORY 512 is out of range for VCPU 1 (allowed: 2048-8192 MiB)"]
        );
    }

    #[test]
    fn test_fargate_memory_bad_step() {
        let errors = validate_input(&container_input("FARGATE", "8", "18000"));
        assert_eq!(
            errors,
            vec!["Fargate MEMORY 18000 must be a multiple of 4096 (starting from 16384) for VCPU 8"]
        );
    }

    #[test]
    fn test_ec2_skips_fargate_table() {
        assert!(validate_input(&container_input("EC2", "3", "100")).is_empty());
    }

    #[test]
    fn test_invalid_resource_values() {
        let errors = validate_input(&container_input("EC2", "abc", "1.5"));
        assert_eq!(
            errors,
            vec![
                "VCPU value \"abc\" is not a valid number",
                "MEMORY value \"1.5\" is not a valid integer",
            ]
        );
    }

    #[test]
    fn test_multinode_requires_node_properties() {
        let input = RegisterJobDefinitionInput::from_document(&json!({
            "JobDefinitionName": "mn",
            "Type": "multinode"
        }))
        .unwrap();
        assert_eq!(
            validate_input(&input),
            vec!["nodeProperties is required when type is \"multinode\""]
        );
    }

    #[test]
    fn test_every_range_boundary_is_accepted() {
        for (vcpu, min, max, _) in FARGATE_MEMORY_RANGES {
            assert!(validate_fargate_resources(vcpu, &min.to_string()).is_none());
            assert!(validate_fargate_resources(vcpu, &max.to_string()).is_none());
        }
    }

    #[test]
    fn test_verify_document() {
        let err = verify_document(&json!({"Type": "container"})).unwrap_err();
        assert_eq!(err.to_string(), "verification failed with 2 error(s)");

        let err = verify_document(&json!({"JobDefinitionName": 12})).unwrap_err();
        assert!(err.to_string().contains("RegisterJobDefinitionInput"));
    }
}
