//! Request validation pipeline.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, path, headers, body)
//!     → request.rs   (path prefix, method, short code)
//!     → GET:  done, forward without body
//!     → POST: body.rs     (content type, size, JSON object, longUrl string)
//!             shortcut.rs (import/ marker, base64, JSON object, closed schema)
//!     → Validated, or the first Rejection
//! ```
//!
//! # Design Decisions
//! - Every stage is a pure function over borrowed request data
//! - The first failure ends the pipeline; nothing is coerced or defaulted
//! - The raw POST body is kept and forwarded byte for byte

pub mod body;
pub mod request;
pub mod shortcut;

use axum::body::Body;
use axum::http::request::Parts;

use crate::config::ValidationConfig;
use crate::error::Rejection;

pub use body::ValidatedBody;
pub use request::ShortUrlRoute;
pub use shortcut::{Shortcut, ShortcutKind};

/// A request that may be forwarded.
#[derive(Debug, Clone)]
pub enum Validated {
    Lookup { short_code: String },
    Create { body: ValidatedBody, shortcut: Shortcut },
}

impl Validated {
    /// Body to send upstream.
    pub fn into_body(self) -> Body {
        match self {
            Self::Lookup { .. } => Body::empty(),
            Self::Create { body, .. } => Body::from(body.raw),
        }
    }
}

/// Run the full pipeline over an inbound request.
pub async fn validate_request(
    parts: &Parts,
    body: Body,
    config: &ValidationConfig,
) -> Result<Validated, Rejection> {
    match request::check_request(&parts.method, parts.uri.path(), &config.path_prefix)? {
        ShortUrlRoute::Lookup { short_code } => Ok(Validated::Lookup { short_code }),
        ShortUrlRoute::Create => {
            body::check_content_type(&parts.headers)?;
            let raw = body::read_body(body, config.max_body_bytes).await?;
            let body = body::check_body(raw)?;
            let shortcut = shortcut::inspect(&body.long_url)?;
            Ok(Validated::Create { body, shortcut })
        }
    }
}
