use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub success: bool,
    pub version: &'static str,
    pub status: &'static str,
    pub backend_configured: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        success: true,
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        backend_configured: state.backend.is_configured(),
    })
}
