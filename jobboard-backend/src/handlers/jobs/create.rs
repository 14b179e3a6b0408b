use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::handlers::jobs::dto::{CreateJobDto, JobResponse};
use crate::{error::ApiError, state::AppState};

pub async fn create(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<CreateJobDto>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(dto) = body.map_err(|rejection| {
        ApiError::rejected("Invalid request body", rejection.status(), rejection.body_text())
    })?;

    let row = state
        .jobs
        .create(dto)
        .await
        .map_err(|e| ApiError::from_service("Error creating job", e))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Job created successfully",
            "data": JobResponse::from(row),
        })),
    ))
}
