//! Public (unauthenticated) forwarding.

use axum::{extract::State, response::Response};

use crate::error::GatewayError;
use crate::http::request::RequestId;
use crate::http::response;
use crate::http::server::AppState;

pub async fn categories(
    State(state): State<AppState>,
    request_id: RequestId,
) -> Result<Response, GatewayError> {
    let reply = state
        .backend
        .get_public(&state.config.backend.categories_path, &request_id)
        .await?;

    Ok(response::relay_lenient(reply, "Failed to fetch categories"))
}
