use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Json, Query};
use serde_json::{json, Value};

use crate::handlers::jobs::dto::AppliedFilters;
use crate::handlers::jobs::rows_to_payload;
use crate::service::ListQuery;
use crate::{error::ApiError, state::AppState};

pub async fn list(
    Extension(state): Extension<Arc<AppState>>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        ApiError::rejected("Invalid query parameters", rejection.status(), rejection.body_text())
    })?;
    let query = ListQuery::from_params(&params);

    let page = state
        .jobs
        .list(&query)
        .await
        .map_err(|e| ApiError::from_service("Error fetching jobs", e))?;

    Ok(Json(json!({
        "success": true,
        "data": rows_to_payload(page.jobs)?,
        "pagination": page.pagination,
        "appliedFilters": AppliedFilters::from_filter(&query.filter),
    })))
}
