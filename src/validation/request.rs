//! Path and method validation.
//!
//! # Rules
//! - The path must equal the resource prefix or continue it with `/`
//!   (`/rest/v3/short-urls`, `/rest/v3/short-urls/abc`, not `/rest/v3/short-urlsx`)
//! - `GET <prefix>/<code>` needs a non-empty short code
//! - `POST` targets the collection itself (`<prefix>` or `<prefix>/`)
//! - Any other method on the resource is rejected with 405
//!
//! Path matching is case-sensitive and has no regex, like route prefix matching.

use axum::http::Method;

use crate::error::Rejection;

/// A request that passed path and method validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortUrlRoute {
    /// `GET <prefix>/<short_code>`
    Lookup { short_code: String },
    /// `POST <prefix>`
    Create,
}

/// Validate `method` and `path` against the resource `prefix`.
pub fn check_request(method: &Method, path: &str, prefix: &str) -> Result<ShortUrlRoute, Rejection> {
    let rest = match path.strip_prefix(prefix) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return Err(Rejection::UnsupportedPath(path.to_string())),
    };

    match *method {
        Method::GET => {
            let short_code = rest.strip_prefix('/').unwrap_or(rest);
            if short_code.is_empty() {
                return Err(Rejection::MissingShortCode);
            }
            Ok(ShortUrlRoute::Lookup {
                short_code: short_code.to_string(),
            })
        }
        Method::POST => {
            if rest.is_empty() || rest == "/" {
                Ok(ShortUrlRoute::Create)
            } else {
                Err(Rejection::UnsupportedPath(path.to_string()))
            }
        }
        _ => Err(Rejection::MethodNotAllowed(method.clone())),
    }
}
