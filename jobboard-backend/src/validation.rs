use serde::Serialize;

/// One rejected field of a request payload.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// The field is absent, null or blank.
    pub fn required(field: &str) -> Self {
        Self::new(field, "required", format!("{field} is required"))
    }

    pub fn is_required(&self) -> bool {
        self.code == "required"
    }
}

/// Render issues as `{ field: { code, message } }`.
pub fn to_payload(issues: &[ValidationIssue]) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = issues
        .iter()
        .map(|issue| {
            (
                issue.field.clone(),
                serde_json::json!({ "code": issue.code, "message": issue.message }),
            )
        })
        .collect();
    serde_json::Value::Object(map)
}
