use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::service::JobServiceError;
use crate::validation::{to_payload, ValidationIssue};

/// Top-level API error shared by all route handlers.
///
/// Every variant renders the `{ success: false, message, ... }` envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        issues: Vec<ValidationIssue>,
    },
    /// An extractor refused the request before the handler ran.
    #[error("{message}: {detail}")]
    Rejected {
        status: StatusCode,
        message: &'static str,
        detail: String,
    },
    #[error("{0}")]
    NotFound(String),
    #[error("{context}: {detail}")]
    Internal {
        context: &'static str,
        detail: String,
    },
    #[error("{0}")]
    Unavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, payload) = match self {
            ApiError::Validation { message, issues } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "message": message,
                    "validation": to_payload(&issues),
                }),
            ),
            ApiError::Rejected {
                status,
                message,
                detail,
            } => (
                status,
                json!({ "success": false, "message": message, "error": detail }),
            ),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "message": message }),
            ),
            ApiError::Internal { context, detail } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "success": false, "message": context, "error": detail }),
            ),
            ApiError::Unavailable(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "success": false, "message": message }),
            ),
        };

        (status, Json(payload)).into_response()
    }
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn rejected(message: &'static str, status: StatusCode, detail: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message,
            detail: detail.into(),
        }
    }

    pub fn internal(context: &'static str, detail: impl ToString) -> Self {
        Self::Internal {
            context,
            detail: detail.to_string(),
        }
    }

    /// Map a service failure onto the envelope for one operation.
    ///
    /// `context` is the operation's failure message, e.g. "Error fetching jobs".
    pub fn from_service(context: &'static str, err: JobServiceError) -> Self {
        match err {
            JobServiceError::Validation(issues) => {
                let message = if issues.iter().any(ValidationIssue::is_required) {
                    "All required fields must be provided"
                } else {
                    "Invalid job data"
                };
                Self::Validation {
                    message: message.to_string(),
                    issues,
                }
            }
            JobServiceError::NotFound => Self::not_found("Job not found"),
            JobServiceError::InvalidId(_) => {
                tracing::warn!(error = %err, "{context}");
                Self::internal(context, err)
            }
            JobServiceError::Store(ref source) => {
                tracing::error!(error = %source, "{context}");
                Self::internal(context, err)
            }
        }
    }
}
