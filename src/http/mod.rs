//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, /health)
//!     → request.rs (request ID)
//!     → validation (path, method, body, shortcut)
//!     → proxy::forwarder (upstream call)
//!     → response.rs (relay status, headers, streamed body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
