//! Configuration validation.
//!
//! Semantic checks that serde cannot express. Validation is a pure function
//! returning every problem found, not just the first, and runs before the
//! config is handed to any subsystem.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// Log levels accepted by `observability.log_level`.
pub const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Which binary the configuration is being validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Proxy,
    ForwardAuth,
}

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("upstream.target is not set")]
    MissingUpstream,

    #[error("upstream.target {value:?}: {reason}")]
    InvalidUpstream { value: String, reason: String },

    #[error("validation.path_prefix {0:?} must start with '/' and must not end with '/'")]
    InvalidPathPrefix(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("timeouts.request_secs ({request}) must be greater than timeouts.upstream_secs ({upstream})")]
    RequestTimeoutTooShort { request: u64, upstream: u64 },

    #[error("observability.log_level {0:?} is not one of off, error, warn, info, debug, trace")]
    InvalidLogLevel(String),

    #[error("auth.usernames has {usernames} entries but auth.passwords has {passwords}")]
    CredentialCountMismatch { usernames: usize, passwords: usize },

    #[error("no credentials configured")]
    NoCredentials,
}

/// Validate the configuration for the given service.
pub fn validate_config(config: &ProxyConfig, service: Service) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    match service {
        Service::Proxy => validate_proxy(config, &mut errors),
        Service::ForwardAuth => validate_auth(config, &mut errors),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_proxy(config: &ProxyConfig, errors: &mut Vec<ValidationError>) {
    check_address("listener.bind_address", &config.listener.bind_address, errors);

    let target = config.upstream.target.trim();
    if target.is_empty() {
        errors.push(ValidationError::MissingUpstream);
    } else if let Err(reason) = check_upstream(target) {
        errors.push(ValidationError::InvalidUpstream {
            value: target.to_string(),
            reason,
        });
    }

    let prefix = &config.validation.path_prefix;
    if !prefix.starts_with('/') || prefix.ends_with('/') {
        errors.push(ValidationError::InvalidPathPrefix(prefix.clone()));
    }

    if config.validation.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("validation.max_body_bytes"));
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.connect_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.upstream_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.timeouts.request_secs <= config.timeouts.upstream_secs {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request: config.timeouts.request_secs,
            upstream: config.timeouts.upstream_secs,
        });
    }
}

fn validate_auth(config: &ProxyConfig, errors: &mut Vec<ValidationError>) {
    check_address("auth.bind_address", &config.auth.bind_address, errors);

    let usernames = config.auth.usernames.len();
    let passwords = config.auth.passwords.len();
    if usernames != passwords {
        errors.push(ValidationError::CredentialCountMismatch {
            usernames,
            passwords,
        });
    } else if usernames == 0 {
        errors.push(ValidationError::NoCredentials);
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

/// The outbound client speaks plain HTTP only, and the inbound path is
/// appended verbatim, so the base URL may not carry a query or fragment.
fn check_upstream(target: &str) -> Result<(), String> {
    let url = Url::parse(target).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("scheme {:?} is not supported, use http", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("must not contain a query or fragment".to_string());
    }
    Ok(())
}
