//! Environment variable fallbacks for configuration

use super::model::Config;

/// Overrides the Batch endpoint when the config file has none
pub const ENV_BATCH_ENDPOINT: &str = "BATCHA_BATCH_ENDPOINT";
/// Overrides the Logs endpoint when the config file has none
pub const ENV_LOGS_ENDPOINT: &str = "BATCHA_LOGS_ENDPOINT";

const REGION_VARS: [&str; 2] = ["AWS_REGION", "AWS_DEFAULT_REGION"];

/// Fill unset fields from the environment.
///
/// `lookup` abstracts `std::env::var` so callers can supply their own source.
pub fn apply_env_fallbacks<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if config.region.is_empty() {
        if let Some(region) = REGION_VARS.iter().find_map(|key| non_empty(*key)) {
            config.region = region;
        }
    }
    if config.endpoint.is_none() {
        config.endpoint = non_empty(ENV_BATCH_ENDPOINT);
    }
    if config.logs_endpoint.is_none() {
        config.logs_endpoint = non_empty(ENV_LOGS_ENDPOINT);
    }
}
