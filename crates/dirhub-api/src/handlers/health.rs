//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database = match state.stores.health_check().await {
        Ok(true) => "connected",
        Ok(false) | Err(_) => "unreachable",
    };
    let status = if database == "connected" { "ok" } else { "degraded" };

    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        object_store: state.config.storage.provider.as_str().to_string(),
    }))
}
