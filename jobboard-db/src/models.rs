use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Employment type of a posting. The set is closed; the `jobs` table
/// enforces the same values with a CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Internship,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown job type '{0}' (expected one of full-time, part-time, contract, internship)")]
pub struct UnknownJobType(pub String);

impl FromStr for JobType {
    type Err = UnknownJobType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownJobType(s.to_owned()))
    }
}

/// A row of the `jobs` table.
///
/// `seq` is the store-assigned insertion counter used to order rows that
/// share a creation timestamp. Timestamps are RFC 3339 UTC strings.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct JobsRow {
    pub seq: i64,
    pub id: String,
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: String,
    pub salary_from: Option<String>,
    pub salary_to: Option<String>,
    pub job_description: String,
    pub requirements: String,
    pub responsibilities: String,
    pub application_deadline: String,
    pub created_at: String,
}

/// A validated posting ready for insertion. Identifier and creation
/// timestamp are assigned by [`crate::jobs::insert_job`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: JobType,
    pub salary_from: Option<String>,
    pub salary_to: Option<String>,
    pub job_description: String,
    pub requirements: String,
    pub responsibilities: String,
    pub application_deadline: DateTime<Utc>,
}

/// Render a timestamp the way every stored date is written:
/// `2025-12-31T00:00:00.000Z`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn job_type_parses_only_the_closed_set() {
        for t in JobType::ALL {
            assert_eq!(t.as_str().parse::<JobType>(), Ok(t));
        }
        assert!("Full-Time".parse::<JobType>().is_err());
        assert!("freelance".parse::<JobType>().is_err());
    }

    #[test]
    fn job_type_serde_matches_wire_names() {
        let v = serde_json::to_value(JobType::PartTime).unwrap();
        assert_eq!(v, serde_json::json!("part-time"));
        let t: JobType = serde_json::from_value(serde_json::json!("internship")).unwrap();
        assert_eq!(t, JobType::Internship);
    }

    #[test]
    fn timestamps_use_millisecond_utc() {
        let ts = Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(ts), "2025-12-31T00:00:00.000Z");
    }
}
