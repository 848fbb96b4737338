//! Upstream forwarding.
//!
//! # Responsibilities
//! - Build the upstream URI: `<target><path>[?<query>]`
//! - Mirror request headers, keeping every value of multi-valued headers
//! - Issue one request per call, bounded by the upstream timeout
//! - Hand the upstream response back unbuffered
//!
//! # Design Decisions
//! - The hyper-util client never follows redirects; 3xx is relayed as-is
//! - No retries: a transport failure ends the request
//! - `host` is derived from the upstream URI, and `content-length` and
//!   `transfer-encoding` come from the forwarded body, so none are copied

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, request::Parts, HeaderMap, Request, Uri},
    response::Response,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::error::ForwardError;
use crate::http::response::relay;

/// Forwards validated requests to the single upstream.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    target: String,
    forward_query: bool,
    timeout: Duration,
}

impl Forwarder {
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            target: upstream.target.trim().trim_end_matches('/').to_string(),
            forward_query: upstream.forward_query,
            timeout: Duration::from_secs(timeouts.upstream_secs),
        }
    }

    /// Upstream base URL, without a trailing slash.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Map an inbound URI onto the upstream.
    pub fn upstream_uri(&self, uri: &Uri) -> Result<Uri, ForwardError> {
        let mut target = format!("{}{}", self.target, uri.path());
        if self.forward_query {
            if let Some(query) = uri.query() {
                target.push('?');
                target.push_str(query);
            }
        }

        target
            .parse::<Uri>()
            .map_err(|source| ForwardError::InvalidUri { uri: target, source })
    }

    /// Build the outbound request from the inbound parts and the body to send.
    pub fn build_request(&self, parts: &Parts, body: Body) -> Result<Request<Body>, ForwardError> {
        let uri = self.upstream_uri(&parts.uri)?;

        let mut builder = Request::builder().method(parts.method.clone()).uri(uri);
        if let Some(headers) = builder.headers_mut() {
            copy_request_headers(&parts.headers, headers);
        }

        Ok(builder.body(body)?)
    }

    /// Forward the request and return the upstream response for relaying.
    pub async fn forward(&self, parts: &Parts, body: Body) -> Result<Response, ForwardError> {
        let request = self.build_request(parts, body)?;

        tracing::debug!(
            method = %request.method(),
            uri = %request.uri(),
            "Forwarding to upstream"
        );
        for (name, value) in request.headers() {
            tracing::trace!(header = %name, value = ?value, "Request header");
        }

        let response = tokio::time::timeout(self.timeout, self.client.request(request))
            .await
            .map_err(|_| ForwardError::Timeout(self.timeout))??;

        tracing::debug!(status = %response.status(), "Upstream responded");

        Ok(relay(response))
    }
}

/// Headers the client derives itself.
const DERIVED: [header::HeaderName; 3] = [
    header::HOST,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
];

/// Copy request headers, appending so every value of a repeated header is
/// kept in order.
pub fn copy_request_headers(from: &HeaderMap, to: &mut HeaderMap) {
    for (name, value) in from {
        if DERIVED.contains(name) {
            continue;
        }
        to.append(name.clone(), value.clone());
    }
}
