use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Extension, Json, Path};
use serde_json::{json, Value};

use crate::handlers::jobs::dto::JobResponse;
use crate::{error::ApiError, state::AppState};

pub async fn get_by_id(
    Extension(state): Extension<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id.map_err(|rejection| {
        ApiError::rejected("Invalid path parameter", rejection.status(), rejection.body_text())
    })?;
    let row = state
        .jobs
        .get(&id)
        .await
        .map_err(|e| ApiError::from_service("Error fetching job", e))?;
    Ok(Json(json!({ "success": true, "data": JobResponse::from(row) })))
}
