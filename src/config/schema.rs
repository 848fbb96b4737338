//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure shared by the
//! validating proxy and the forward-auth service. All types derive Serde
//! traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for both services.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration for the proxy.
    pub listener: ListenerConfig,

    /// The single upstream URL-shortener service.
    pub upstream: UpstreamConfig,

    /// Request validation settings.
    pub validation: ValidationConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Forward-auth service settings.
    pub auth: AuthConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Upstream target configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL the inbound path is appended to (e.g., "http://shlink:8080").
    pub target: String,

    /// Append the inbound query string to the upstream URL.
    pub forward_query: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            forward_query: true,
        }
    }
}

/// Request validation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Resource prefix all proxied requests must live under.
    pub path_prefix: String,

    /// Largest POST body accepted, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            path_prefix: "/rest/v3/short-urls".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Bound on a single upstream call (until response headers) in seconds.
    pub upstream_secs: u64,

    /// Request timeout (total time for request/response) in seconds. Must
    /// exceed `upstream_secs` so upstream timeouts surface as 500.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
            request_secs: 35,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (off, error, warn, info, debug, trace).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Forward-auth service configuration.
///
/// `usernames[i]` pairs with `passwords[i]`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Bind address of the forward-auth service.
    pub bind_address: String,

    pub usernames: Vec<String>,

    pub passwords: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8001".to_string(),
            usernames: Vec::new(),
            passwords: Vec::new(),
        }
    }
}
