use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        detail: Option<String>,
        validation: Option<Value>,
    },
    #[error("failed to parse response: {0}")]
    Parse(String),
    /// Rejected locally before any request was sent.
    #[error("{0}")]
    Form(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
