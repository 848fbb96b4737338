//! Response relaying.
//!
//! # Responsibilities
//! - Hand the upstream response to the client unchanged
//! - Stream the upstream body instead of buffering it
//!
//! # Design Decisions
//! - Status and the full header map (repeated headers included) are moved
//!   over as-is; nothing is added or stripped
//! - Error responses are produced by `IntoResponse` on the error types

use axum::{body::Body, http::Response as HttpResponse, response::Response};
use hyper::body::Incoming;

/// Turn an upstream response into a client response.
pub fn relay(upstream: HttpResponse<Incoming>) -> Response {
    let (parts, body) = upstream.into_parts();
    Response::from_parts(parts, Body::new(body))
}
