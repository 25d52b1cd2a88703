//! Authenticated catch-all forwarding.
//!
//! `/api/proxy/{*path}` is re-issued against the backend at `{base}/{path}`
//! with the session's bearer token. Without a session nothing is sent.
//! Only GET, POST, PUT, PATCH and DELETE are forwarded; axum's implicit HEAD
//! on `get` routes is refused here.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, RawQuery, State,
    },
    http::Method,
    response::Response,
};

use crate::error::GatewayError;
use crate::http::request::RequestId;
use crate::http::response;
use crate::http::server::AppState;
use crate::session::Session;
use crate::upstream::ForwardedRequest;

pub async fn forward(
    State(state): State<AppState>,
    session: Session,
    request_id: RequestId,
    method: Method,
    path: Result<Path<String>, PathRejection>,
    RawQuery(query): RawQuery,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, GatewayError> {
    if !is_forwardable(&method) {
        return Err(GatewayError::MethodNotAllowed);
    }
    let credential = session.credential().ok_or(GatewayError::Unauthorized)?;
    let Path(path) = path?;
    let body = body?;

    let request = ForwardedRequest::new(method, &path, query, &body);
    let reply = state
        .backend
        .forward(&request, &credential, &request_id)
        .await?;

    response::relay(reply)
}

fn is_forwardable(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
