//! Response shaping.
//!
//! # Responsibilities
//! - Render the `{success, message}` envelope shared by every handler
//! - Relay backend replies (status and JSON body) to the browser
//!
//! # Design Decisions
//! - Backend bodies are opaque `serde_json::Value`s, never re-shaped
//! - An empty backend body relays the status alone (e.g. 204)
//! - Strict relay treats a non-JSON body as a decode failure; lenient relay
//!   substitutes a failure envelope carrying the backend status

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::upstream::BackendReply;

/// Wire body shared by every gateway-authored response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
}

impl Envelope {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

pub fn success(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(Envelope::ok(message))).into_response()
}

pub fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(Envelope::failed(message))).into_response()
}

/// Relay a backend reply, failing if its body is not JSON.
pub fn relay(reply: BackendReply) -> Result<Response, GatewayError> {
    if reply.body.is_empty() {
        return Ok(reply.status.into_response());
    }
    let value = reply.json()?;
    Ok((reply.status, Json(value)).into_response())
}

/// Relay a backend reply, substituting an envelope for a non-JSON body.
pub fn relay_lenient(reply: BackendReply, fallback: &str) -> Response {
    if reply.body.is_empty() {
        return reply.status.into_response();
    }
    match reply.json() {
        Ok(value) => (reply.status, Json(value)).into_response(),
        Err(e) => {
            tracing::warn!(status = %reply.status, error = %e, "Backend returned a non-JSON body");
            failure(reply.status, fallback)
        }
    }
}
