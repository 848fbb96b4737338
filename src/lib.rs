//! Validating reverse proxy for a URL-shortener API, plus a forward-auth
//! credential check service.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod validation;

pub use config::schema::ProxyConfig;
pub use error::{ForwardError, Rejection};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
