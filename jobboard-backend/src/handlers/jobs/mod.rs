pub mod create;
pub mod dto;
pub mod get_by_id;
pub mod list;
pub mod search;

use dto::JobResponse;
use jobboard_db::JobsRow;
use serde_json::Value;

use crate::error::ApiError;

pub(crate) fn rows_to_payload(rows: Vec<JobsRow>) -> Result<Value, ApiError> {
    let jobs: Vec<JobResponse> = rows.into_iter().map(JobResponse::from).collect();
    serde_json::to_value(jobs).map_err(|e| ApiError::internal("Error serializing jobs", e))
}
