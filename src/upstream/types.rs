//! Values exchanged with the backend API.

use axum::body::Bytes;
use axum::http::{Method, StatusCode};
use serde::{Deserialize, Serialize};

/// Credential pair posted to the login endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A browser call re-addressed to the backend.
#[derive(Debug, Clone)]
pub struct ForwardedRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl ForwardedRequest {
    /// Build from the captured path, raw query and raw body.
    ///
    /// GET, HEAD and DELETE never carry a body. For other methods an absent
    /// or unparseable body is dropped rather than rejected.
    pub fn new(method: Method, path: &str, query: Option<String>, body: &[u8]) -> Self {
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();

        let carries_body = !matches!(method, Method::GET | Method::HEAD | Method::DELETE);
        let body = if carries_body && !body.is_empty() {
            serde_json::from_slice(body).ok()
        } else {
            None
        };

        Self {
            method,
            segments,
            query: query.filter(|q| !q.is_empty()),
            body,
        }
    }
}

/// Status and raw body returned by the backend.
#[derive(Debug, Clone)]
pub struct BackendReply {
    pub status: StatusCode,
    pub body: Bytes,
}

impl BackendReply {
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.body)
    }

    /// The backend's `message` field, when the body is JSON and has one.
    pub fn message(&self) -> Option<String> {
        self.json()
            .ok()?
            .get("message")?
            .as_str()
            .map(str::to_owned)
    }
}
