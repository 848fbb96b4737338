//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for both binaries
//! - Map `observability.log_level` onto filter directives
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level when set

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Targets the configured level applies to.
const TARGETS: [&str; 3] = ["shortcut_proxy", "forward_auth", "tower_http"];

/// Filter directives for `level`, e.g. `shortcut_proxy=debug,...`.
pub fn directives(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber.
pub fn init(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(level))))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
