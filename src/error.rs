//! Error types for the request pipeline.
//!
//! Every error maps to a fixed HTTP status and a generic body. The specific
//! failed check never reaches the client; it is logged and counted under
//! [`Rejection::reason`].

use std::time::Duration;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::validation::shortcut::ShortcutKind;

/// Body sent for every validation failure.
pub const INVALID_BODY: &str = "Invalid";

/// A request that failed validation and must not be forwarded.
#[derive(Debug, Error)]
pub enum Rejection {
    // Path and method
    #[error("path {0:?} is outside the short URL resource")]
    UnsupportedPath(String),

    #[error("method {0} is not allowed on the short URL resource")]
    MethodNotAllowed(Method),

    #[error("missing short code")]
    MissingShortCode,

    // Body
    #[error("content type is not application/json")]
    ContentType,

    #[error("request body could not be read: {0}")]
    UnreadableBody(String),

    #[error("request body is empty")]
    EmptyBody,

    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("request body is not a JSON object")]
    BodyNotObject,

    #[error("missing longUrl key")]
    MissingLongUrl,

    #[error("longUrl is null")]
    NullLongUrl,

    #[error("longUrl is not a string")]
    LongUrlNotString,

    // Embedded shortcut
    #[error("longUrl does not contain 'import/'")]
    MissingImportMarker,

    #[error("longUrl has nothing after 'import/'")]
    EmptyPayload,

    #[error("shortcut payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("shortcut payload is not valid JSON: {0}")]
    InvalidPayloadJson(#[source] serde_json::Error),

    #[error("shortcut payload is not a JSON object")]
    PayloadNotObject,

    #[error("missing type key")]
    MissingType,

    #[error("invalid type key")]
    UnknownType,

    #[error("missing {0} key")]
    MissingKey(&'static str),

    #[error("{kind} has {count} keys, at most {max} allowed")]
    TooManyKeys {
        kind: ShortcutKind,
        count: usize,
        max: usize,
    },
}

impl Rejection {
    /// Stable label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::UnsupportedPath(_) => "unsupported_path",
            Self::MethodNotAllowed(_) => "method_not_allowed",
            Self::MissingShortCode => "missing_short_code",
            Self::ContentType => "content_type",
            Self::UnreadableBody(_) => "unreadable_body",
            Self::EmptyBody => "empty_body",
            Self::InvalidJson(_) => "invalid_json",
            Self::BodyNotObject => "body_not_object",
            Self::MissingLongUrl => "missing_long_url",
            Self::NullLongUrl => "null_long_url",
            Self::LongUrlNotString => "long_url_not_string",
            Self::MissingImportMarker => "missing_import_marker",
            Self::EmptyPayload => "empty_payload",
            Self::InvalidBase64(_) => "invalid_base64",
            Self::InvalidPayloadJson(_) => "invalid_payload_json",
            Self::PayloadNotObject => "payload_not_object",
            Self::MissingType => "missing_type",
            Self::UnknownType => "unknown_type",
            Self::MissingKey(_) => "missing_key",
            Self::TooManyKeys { .. } => "too_many_keys",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Self::MethodNotAllowed(_) => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, HeaderValue::from_static("GET, POST"))],
                "Method not allowed",
            )
                .into_response(),
            _ => (StatusCode::BAD_REQUEST, INVALID_BODY).into_response(),
        }
    }
}

/// Failure to relay a validated request to the upstream.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid upstream URI {uri:?}: {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },

    #[error("failed to build upstream request: {0}")]
    Build(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

impl ForwardError {
    /// Whether the request never left the proxy.
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::InvalidUri { .. } | Self::Build(_))
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let body = if self.is_construction() {
            "Error creating request"
        } else {
            "Error performing request"
        };
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
