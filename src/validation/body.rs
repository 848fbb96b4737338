//! POST body validation.
//!
//! The content type is checked before the body is read. The raw bytes are
//! kept so the upstream receives exactly what the client sent.

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap};
use serde_json::Value;

use crate::error::Rejection;

/// Key holding the URL to shorten.
pub const LONG_URL_KEY: &str = "longUrl";

/// A body that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedBody {
    /// Body exactly as received.
    pub raw: Bytes,
    pub long_url: String,
}

/// Require `Content-Type: application/json`. Media type parameters such as
/// `charset` are ignored; the type itself is compared case-insensitively.
pub fn check_content_type(headers: &HeaderMap) -> Result<(), Rejection> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false);

    if is_json {
        Ok(())
    } else {
        Err(Rejection::ContentType)
    }
}

/// Read the whole body, refusing anything larger than `limit` bytes.
pub async fn read_body(body: Body, limit: usize) -> Result<Bytes, Rejection> {
    axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| Rejection::UnreadableBody(e.to_string()))
}

/// Validate the raw body and extract `longUrl`.
pub fn check_body(raw: Bytes) -> Result<ValidatedBody, Rejection> {
    if raw.is_empty() {
        return Err(Rejection::EmptyBody);
    }

    let parsed: Value = serde_json::from_slice(&raw).map_err(Rejection::InvalidJson)?;
    let object = parsed.as_object().ok_or(Rejection::BodyNotObject)?;

    let long_url = match object.get(LONG_URL_KEY) {
        None => return Err(Rejection::MissingLongUrl),
        Some(Value::Null) => return Err(Rejection::NullLongUrl),
        Some(Value::String(url)) => url.clone(),
        Some(_) => return Err(Rejection::LongUrlNotString),
    };

    Ok(ValidatedBody { raw, long_url })
}
