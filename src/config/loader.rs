//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, Service, ValidationError};

/// Environment variables that override file settings.
pub const ENV_PROXY_TARGET: &str = "PROXY_TARGET";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LISTEN_ADDRESS: &str = "LISTEN_ADDRESS";
pub const ENV_PATH_PREFIX: &str = "PATH_PREFIX";
pub const ENV_AUTH_ADDRESS: &str = "AUTH_LISTEN_ADDRESS";
pub const ENV_AUTH_USERNAMES: &str = "AUTH_USERNAMES";
pub const ENV_AUTH_PASSWORDS: &str = "AUTH_PASSWORDS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration for `service`: the optional TOML file first, then
/// environment overrides, then validation.
pub fn load_config(path: Option<&Path>, service: Service) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config, service).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply overrides from `lookup`, which maps a variable name to its value.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(target) = lookup(ENV_PROXY_TARGET) {
        config.upstream.target = target;
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
        config.observability.log_level = level;
    }
    if let Some(address) = lookup(ENV_LISTEN_ADDRESS) {
        config.listener.bind_address = address;
    }
    if let Some(prefix) = lookup(ENV_PATH_PREFIX) {
        config.validation.path_prefix = prefix;
    }
    if let Some(address) = lookup(ENV_AUTH_ADDRESS) {
        config.auth.bind_address = address;
    }
    if let Some(usernames) = lookup(ENV_AUTH_USERNAMES) {
        config.auth.usernames = split_list(&usernames);
    }
    if let Some(passwords) = lookup(ENV_AUTH_PASSWORDS) {
        config.auth.passwords = split_list(&passwords);
    }
}

/// Split a comma-separated list. Entries are kept verbatim (no trimming) so
/// positions stay aligned between parallel lists; an empty value is an empty
/// list.
pub fn split_list(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(str::to_string).collect()
}
