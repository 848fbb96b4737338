//! Forward-auth service.
//!
//! # Data Flow
//! ```text
//! Fronting proxy subrequest (POST /auth, JSON credentials)
//!     → handler.rs (decode body)
//!     → credentials.rs (exact match against configured pairs)
//!     → 200 allow | 401 deny | 400 malformed JSON
//! ```
//!
//! # Design Decisions
//! - Stateless per request; the store is immutable after startup
//! - Deployed as its own binary (`forward-auth`), sharing config with the proxy

pub mod credentials;
pub mod handler;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::lifecycle::ShutdownSignal;

pub use credentials::CredentialStore;
pub use handler::{AuthDecision, AuthResult, Credentials};

/// Build the forward-auth router.
pub fn router(store: Arc<CredentialStore>) -> Router {
    Router::new()
        .route("/auth", post(handler::auth_handler))
        .route("/", post(handler::auth_handler))
        .route("/health", get(handler::health_handler))
        .with_state(store)
        .layer(TraceLayer::new_for_http())
}

/// HTTP server for the forward-auth service.
pub struct AuthServer {
    router: Router,
    credentials: usize,
}

impl AuthServer {
    pub fn new(store: CredentialStore) -> Self {
        let credentials = store.len();
        Self {
            router: router(Arc::new(store)),
            credentials,
        }
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            credentials = self.credentials,
            "Forward-auth server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("Forward-auth server stopped");
        Ok(())
    }
}
