//! From trait implementations for BatchaError conversions

use super::types::BatchaError;

impl From<std::io::Error> for BatchaError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for BatchaError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<serde_yaml::Error> for BatchaError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::yaml(error.to_string())
    }
}

impl From<reqwest::Error> for BatchaError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        let url = error.url().map(|u| u.to_string());
        Self::Http {
            message: error.to_string(),
            url,
            status_code,
        }
    }
}
