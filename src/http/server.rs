//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Answer `/health` before any validation
//! - Run every other request through validation, then forward it
//! - Graceful shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ProxyConfig, ValidationConfig};
use crate::http::request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::proxy::Forwarder;
use crate::validation::{validate_request, Validated};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Forwarder,
    pub validation: Arc<ValidationConfig>,
}

impl AppState {
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self {
            forwarder: Forwarder::new(&config.upstream, &config.timeouts),
            validation: Arc::new(config.validation.clone()),
        }
    }
}

/// HTTP server for the validating proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let state = AppState::from_config(&config);
        let router = build_router(&config, state);
        Self { router, config }
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.target,
            path_prefix = %self.config.validation.path_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the server without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &ProxyConfig, state: AppState) -> Router {
    Router::new()
        .route("/health", any(health_handler))
        .route("/{*path}", any(proxy_handler))
        .route("/", any(proxy_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
}

/// Liveness probe: always 200 with an empty body.
async fn health_handler() -> StatusCode {
    StatusCode::OK
}

/// Main proxy handler.
/// Validates the request and forwards it, or answers with the rejection.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers).to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        path = %parts.uri.path(),
        "Request received"
    );

    let response = match validate_request(&parts, body, &state.validation).await {
        Ok(validated) => {
            match &validated {
                Validated::Lookup { short_code } => {
                    tracing::debug!(request_id = %request_id, short_code = %short_code, "Proxying lookup");
                }
                Validated::Create { shortcut, .. } => {
                    tracing::debug!(
                        request_id = %request_id,
                        kind = %shortcut.kind(),
                        id = %shortcut.id(),
                        "Proxying create"
                    );
                }
            }

            match state.forwarder.forward(&parts, validated.into_body()).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(request_id = %request_id, error = %e, "Upstream error");
                    metrics::record_upstream_error();
                    e.into_response()
                }
            }
        }
        Err(rejection) => {
            tracing::debug!(
                request_id = %request_id,
                reason = rejection.reason(),
                error = %rejection,
                "Request rejected"
            );
            metrics::record_rejection(rejection.reason());
            rejection.into_response()
        }
    };

    metrics::record_request(&parts.method, response.status().as_u16(), start_time);
    tracing::debug!(
        request_id = %request_id,
        status = %response.status(),
        "Request completed"
    );
    response
}
