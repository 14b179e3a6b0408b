use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use jobboard_db::{JobType, JobsRow, NewJob};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::ValidationIssue;

/// Required fields in the order they are reported.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "jobTitle",
    "companyName",
    "location",
    "jobType",
    "jobDescription",
    "requirements",
    "responsibilities",
    "applicationDeadline",
];

/// Response DTO for job postings - uses camelCase for JSON serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_to: Option<String>,
    pub job_description: String,
    pub requirements: String,
    pub responsibilities: String,
    pub application_deadline: String,
    pub created_at: String,
}

impl From<JobsRow> for JobResponse {
    fn from(row: JobsRow) -> Self {
        Self {
            id: row.id,
            job_title: row.job_title,
            company_name: row.company_name,
            location: row.location,
            job_type: row.job_type,
            salary_from: row.salary_from,
            salary_to: row.salary_to,
            job_description: row.job_description,
            requirements: row.requirements,
            responsibilities: row.responsibilities,
            application_deadline: row.application_deadline,
            created_at: row.created_at,
        }
    }
}

/// Body of `POST /api/jobs`.
///
/// Fields are kept as raw JSON so that missing or mistyped values surface
/// as validation issues rather than deserialization failures. Numbers are
/// accepted wherever text is expected and kept in their decimal form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobDto {
    #[serde(default)]
    pub job_title: Option<Value>,
    #[serde(default)]
    pub company_name: Option<Value>,
    #[serde(default)]
    pub location: Option<Value>,
    #[serde(default)]
    pub job_type: Option<Value>,
    #[serde(default)]
    pub salary_from: Option<Value>,
    #[serde(default)]
    pub salary_to: Option<Value>,
    #[serde(default)]
    pub job_description: Option<Value>,
    #[serde(default)]
    pub requirements: Option<Value>,
    #[serde(default)]
    pub responsibilities: Option<Value>,
    #[serde(default)]
    pub application_deadline: Option<Value>,
}

/// Text content of a field: `Ok(None)` when absent or null, `Err` when the
/// value is a boolean, array or object.
fn text_of(value: &Option<Value>) -> Result<Option<String>, &'static str> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(_)) => Err("a boolean"),
        Some(Value::Array(_)) => Err("an array"),
        Some(Value::Object(_)) => Err("an object"),
    }
}

impl CreateJobDto {
    fn raw(&self, name: &str) -> &Option<Value> {
        match name {
            "jobTitle" => &self.job_title,
            "companyName" => &self.company_name,
            "location" => &self.location,
            "jobType" => &self.job_type,
            "salaryFrom" => &self.salary_from,
            "salaryTo" => &self.salary_to,
            "jobDescription" => &self.job_description,
            "requirements" => &self.requirements,
            "responsibilities" => &self.responsibilities,
            "applicationDeadline" => &self.application_deadline,
            _ => &None,
        }
    }

    /// Required fields that are absent, null or blank, in reporting order.
    /// Mistyped fields are reported by [`CreateJobDto::validate`] instead.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .into_iter()
            .filter(|name| match text_of(self.raw(name)) {
                Ok(Some(v)) => v.trim().is_empty(),
                Ok(None) => true,
                Err(_) => false,
            })
            .collect()
    }

    /// Check the payload and turn it into an insertable posting.
    ///
    /// Title, company, location and salaries are stored trimmed; the long
    /// text fields are stored as sent. Blank salaries are dropped.
    pub fn validate(self) -> Result<NewJob, Vec<ValidationIssue>> {
        let mut issues: Vec<ValidationIssue> = self
            .missing_fields()
            .into_iter()
            .map(ValidationIssue::required)
            .collect();

        let mut fields: HashMap<&'static str, String> = HashMap::new();
        for name in REQUIRED_FIELDS.into_iter().chain(["salaryFrom", "salaryTo"]) {
            match text_of(self.raw(name)) {
                Ok(Some(v)) => {
                    fields.insert(name, v);
                }
                Ok(None) => {}
                Err(kind) => issues.push(ValidationIssue::new(
                    name,
                    "invalid_type",
                    format!("{name} must be text, found {kind}"),
                )),
            }
        }

        let job_type = fields
            .get("jobType")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty());
        let job_type = match job_type.map(str::parse::<JobType>) {
            Some(Ok(t)) => Some(t),
            Some(Err(e)) => {
                issues.push(ValidationIssue::new("jobType", "invalid_choice", e.to_string()));
                None
            }
            None => None,
        };

        let deadline = fields
            .get("applicationDeadline")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty());
        let deadline = match deadline.map(|raw| (raw, parse_deadline(raw))) {
            Some((_, Some(ts))) => Some(ts),
            Some((raw, None)) => {
                issues.push(ValidationIssue::new(
                    "applicationDeadline",
                    "invalid_date",
                    format!("'{raw}' is not a valid date"),
                ));
                None
            }
            None => None,
        };

        match (job_type, deadline) {
            (Some(job_type), Some(application_deadline)) if issues.is_empty() => Ok(NewJob {
                job_title: trimmed(fields.remove("jobTitle")),
                company_name: trimmed(fields.remove("companyName")),
                location: trimmed(fields.remove("location")),
                job_type,
                salary_from: optional_salary(fields.remove("salaryFrom")),
                salary_to: optional_salary(fields.remove("salaryTo")),
                job_description: fields.remove("jobDescription").unwrap_or_default(),
                requirements: fields.remove("requirements").unwrap_or_default(),
                responsibilities: fields.remove("responsibilities").unwrap_or_default(),
                application_deadline,
            }),
            _ => Err(issues),
        }
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// A blank salary is stored as absent rather than as `""`. An empty
/// string would sort below every bound and match any `maxSalary` filter,
/// so such postings deliberately drop out of max-only salary listings.
fn optional_salary(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Accepts `YYYY-MM-DD` (midnight UTC), full RFC 3339, or a naive
/// `YYYY-MM-DDTHH:MM[:SS]` read as UTC.
pub fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .into_iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.and_utc())
}

/// Echo of the filter parameters a list request was evaluated with.
/// Empty values are reported as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub min_salary: Option<String>,
    pub max_salary: Option<String>,
}

impl AppliedFilters {
    pub fn from_filter(filter: &jobboard_db::JobFilter) -> Self {
        let echo = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        Self {
            job_title: echo(&filter.job_title),
            location: echo(&filter.location),
            job_type: echo(&filter.job_type),
            min_salary: echo(&filter.min_salary),
            max_salary: echo(&filter.max_salary),
        }
    }
}
