//! Login, logout and session probe.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::GatewayError;
use crate::http::request::RequestId;
use crate::http::response;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::session::Session;
use crate::upstream::LoginCredentials;

const LOGIN_FAILED: &str = "Login failed";

/// Exchange an email/password pair for a session cookie.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    request_id: RequestId,
    body: Result<Bytes, BytesRejection>,
) -> Result<(Session, Response), GatewayError> {
    let credentials: LoginCredentials = serde_json::from_slice(&body?)?;
    let reply = state
        .backend
        .login(&state.config.backend.login_path, &credentials, &request_id)
        .await?;

    if !reply.status.is_success() {
        metrics::record_session("login_rejected");
        tracing::info!(request_id = %request_id, status = %reply.status, "Backend rejected login");
        return Err(GatewayError::Upstream {
            status: reply.status,
            message: reply.message().unwrap_or_else(|| LOGIN_FAILED.to_string()),
        });
    }

    let payload = reply.json()?;
    let token = extract_token(&payload, &state.config.backend.token_pointer)
        .ok_or(GatewayError::UpstreamContract)?;

    metrics::record_session("login");
    tracing::info!(request_id = %request_id, "Session established");

    Ok((
        session.establish(token),
        response::success(StatusCode::OK, "Login successful"),
    ))
}

/// Drop the session cookie. Safe to call without a session.
pub async fn logout(session: Session, request_id: RequestId) -> (Session, Response) {
    if session.is_authenticated() {
        metrics::record_session("logout");
        tracing::info!(request_id = %request_id, "Session cleared");
    }
    (
        session.clear(),
        response::success(StatusCode::OK, "Logged out successfully"),
    )
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub success: bool,
    pub authenticated: bool,
}

pub async fn session_status(session: Session) -> Json<SessionStatus> {
    Json(SessionStatus {
        success: true,
        authenticated: session.is_authenticated(),
    })
}

fn extract_token(payload: &Value, pointer: &str) -> Option<String> {
    payload
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}
