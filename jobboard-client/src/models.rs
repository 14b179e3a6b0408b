use serde::{Deserialize, Serialize};

use crate::filters::PAGE_SIZE;

/// A job posting as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: String,
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: String,
    #[serde(default)]
    pub salary_from: Option<String>,
    #[serde(default)]
    pub salary_to: Option<String>,
    pub job_description: String,
    pub requirements: String,
    pub responsibilities: String,
    pub application_deadline: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current: u32,
    pub total: u64,
    pub count: usize,
    pub total_jobs: u64,
}

impl Pagination {
    /// 1-based positions of the first and last job on the current page,
    /// assuming pages of [`PAGE_SIZE`].
    pub fn showing_range(&self) -> (u64, u64) {
        let size = u64::from(PAGE_SIZE);
        let current = u64::from(self.current.max(1));
        ((current - 1) * size + 1, (current * size).min(self.total_jobs))
    }

    /// "Showing 9 to 16 of 20 jobs".
    pub fn showing_text(&self) -> String {
        let (from, to) = self.showing_range();
        format!("Showing {from} to {to} of {} jobs", self.total_jobs)
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.current) < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub min_salary: Option<String>,
    pub max_salary: Option<String>,
}

/// Body of a successful list response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsPage {
    pub data: Vec<Job>,
    pub pagination: Pagination,
    pub applied_filters: AppliedFilters,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResults {
    pub data: Vec<Job>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(current: u32, total_jobs: u64) -> Pagination {
        Pagination {
            current,
            total: total_jobs.div_ceil(u64::from(PAGE_SIZE)),
            count: 0,
            total_jobs,
        }
    }

    #[test]
    fn showing_range_clamps_to_total() {
        assert_eq!(page(1, 20).showing_range(), (1, 8));
        assert_eq!(page(3, 20).showing_range(), (17, 20));
        assert_eq!(page(2, 20).showing_text(), "Showing 9 to 16 of 20 jobs");
    }

    #[test]
    fn next_and_previous() {
        assert!(page(1, 20).has_next());
        assert!(!page(3, 20).has_next());
        assert!(!page(1, 20).has_previous());
        assert!(page(2, 20).has_previous());
    }

    #[test]
    fn job_reads_wire_names() {
        let job: Job = serde_json::from_value(serde_json::json!({
            "_id": "abc",
            "jobTitle": "Engineer",
            "companyName": "Acme",
            "location": "Pune",
            "jobType": "full-time",
            "jobDescription": "d",
            "requirements": "r",
            "responsibilities": "s",
            "applicationDeadline": "2030-01-31T00:00:00.000Z",
            "createdAt": "2025-01-01T00:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(job.id, "abc");
        assert_eq!(job.salary_from, None);
    }
}
