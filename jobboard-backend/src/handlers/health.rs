use std::sync::Arc;

use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use chrono::Utc;
use jobboard_db::format_timestamp;
use serde_json::{json, Value};

use crate::{error::ApiError, state::AppState};

/// Liveness: answers while the process is up, whatever the store's state.
pub async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Server is running",
        "timestamp": format_timestamp(Utc::now()),
    }))
}

/// Readiness: 200 only when the store answers a trivial query.
pub async fn ready(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    match state.jobs.ping().await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "message": "ready" })),
        )),
        Err(error) => {
            tracing::warn!(%error, "readiness check failed");
            Err(ApiError::Unavailable("database unavailable".to_string()))
        }
    }
}

/// JSON 404 for anything outside the routing table.
pub async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
