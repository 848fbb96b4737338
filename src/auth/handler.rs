//! Forward-auth endpoint.
//!
//! The fronting proxy posts `{"username": ..., "password": ...}` and acts on
//! the status code; the JSON decision mirrors it for consumers that read the
//! body.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::CredentialStore;

/// Submitted credentials. Missing fields count as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of every decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthDecision {
    pub result: AuthResult,
    pub is_superuser: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthResult {
    Allow,
    Deny,
}

impl AuthDecision {
    pub fn allow() -> Self {
        Self {
            result: AuthResult::Allow,
            is_superuser: false,
        }
    }

    pub fn deny() -> Self {
        Self {
            result: AuthResult::Deny,
            is_superuser: false,
        }
    }
}

impl IntoResponse for AuthDecision {
    fn into_response(self) -> Response {
        let status = match self.result {
            AuthResult::Allow => StatusCode::OK,
            AuthResult::Deny => StatusCode::UNAUTHORIZED,
        };
        (status, Json(self)).into_response()
    }
}

pub async fn auth_handler(State(store): State<Arc<CredentialStore>>, body: Bytes) -> Response {
    let credentials: Credentials = match serde_json::from_slice(&body) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, "Malformed credentials");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    if store.verify(&credentials.username, &credentials.password) {
        tracing::debug!(username = %credentials.username, "Credentials accepted");
        AuthDecision::allow().into_response()
    } else {
        tracing::info!(username = %credentials.username, "Credentials denied");
        AuthDecision::deny().into_response()
    }
}

pub async fn health_handler() -> StatusCode {
    StatusCode::OK
}
