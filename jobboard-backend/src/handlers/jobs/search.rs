use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Extension, Json, Path};
use serde_json::{json, Value};

use crate::handlers::jobs::rows_to_payload;
use crate::{error::ApiError, state::AppState};

/// Legacy free-text search over title, company, location and description.
pub async fn search(
    Extension(state): Extension<Arc<AppState>>,
    query: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(query) = query.map_err(|rejection| {
        ApiError::rejected("Invalid path parameter", rejection.status(), rejection.body_text())
    })?;
    let rows = state
        .jobs
        .search(&query)
        .await
        .map_err(|e| ApiError::from_service("Error searching jobs", e))?;
    let count = rows.len();
    Ok(Json(json!({
        "success": true,
        "data": rows_to_payload(rows)?,
        "count": count,
    })))
}
