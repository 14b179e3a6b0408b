//! Search filter state shared between the search bar and the job list.

use serde::{Deserialize, Serialize};

/// Jobs requested per page.
pub const PAGE_SIZE: u32 = 8;
/// Salary slider ceiling; a maximum at or above it means "no maximum".
pub const SALARY_CEILING: u64 = 200_000;
pub const DEFAULT_MIN_SALARY: u64 = 50_000;
pub const DEFAULT_MAX_SALARY: u64 = 80_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub job_title: String,
    pub location: String,
    pub job_type: String,
    pub min_salary: u64,
    pub max_salary: u64,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            job_title: String::new(),
            location: String::new(),
            job_type: String::new(),
            min_salary: DEFAULT_MIN_SALARY,
            max_salary: DEFAULT_MAX_SALARY,
        }
    }
}

/// Partial update; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFiltersUpdate {
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub min_salary: Option<u64>,
    pub max_salary: Option<u64>,
}

impl SearchFilters {
    /// Merge `update` into the current state.
    pub fn update(&mut self, update: SearchFiltersUpdate) {
        if let Some(v) = update.job_title {
            self.job_title = v;
        }
        if let Some(v) = update.location {
            self.location = v;
        }
        if let Some(v) = update.job_type {
            self.job_type = v;
        }
        if let Some(v) = update.min_salary {
            self.min_salary = v;
        }
        if let Some(v) = update.max_salary {
            self.max_salary = v;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether anything differs from the defaults. Whitespace-only titles
    /// count as empty.
    pub fn has_active_filters(&self) -> bool {
        !self.job_title.trim().is_empty()
            || !self.location.is_empty()
            || !self.job_type.is_empty()
            || self.min_salary != DEFAULT_MIN_SALARY
            || self.max_salary != DEFAULT_MAX_SALARY
    }

    /// Query pairs for `GET /api/jobs`, in the order they are sent.
    pub fn to_query(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", page.to_string()), ("limit", PAGE_SIZE.to_string())];

        let title = self.job_title.trim();
        if !title.is_empty() {
            params.push(("jobTitle", title.to_string()));
        }
        if !self.location.is_empty() {
            params.push(("location", self.location.clone()));
        }
        if !self.job_type.is_empty() {
            params.push(("jobType", self.job_type.clone()));
        }
        if self.min_salary > 0 {
            params.push(("minSalary", self.min_salary.to_string()));
        }
        if self.max_salary < SALARY_CEILING {
            params.push(("maxSalary", self.max_salary.to_string()));
        }
        params
    }

    /// Salary chip label, e.g. "₹50k - ₹80k".
    pub fn summary_range(&self) -> String {
        format!(
            "₹{}k - ₹{}k",
            round_thousands(self.min_salary),
            round_thousands(self.max_salary)
        )
    }
}

fn round_thousands(amount: u64) -> u64 {
    (amount + 500) / 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(params: &[(&'static str, String)]) -> Vec<&'static str> {
        params.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn defaults_send_page_limit_and_salary_bounds() {
        let filters = SearchFilters::default();
        assert!(!filters.has_active_filters());
        let params = filters.to_query(1);
        assert_eq!(
            params,
            vec![
                ("page", "1".to_string()),
                ("limit", "8".to_string()),
                ("minSalary", "50000".to_string()),
                ("maxSalary", "80000".to_string()),
            ]
        );
    }

    #[test]
    fn blank_title_is_not_sent_and_not_active() {
        let mut filters = SearchFilters::default();
        filters.update(SearchFiltersUpdate {
            job_title: Some("   ".into()),
            ..Default::default()
        });
        assert!(!filters.has_active_filters());
        assert!(!keys(&filters.to_query(1)).contains(&"jobTitle"));

        filters.update(SearchFiltersUpdate {
            job_title: Some("  dev ".into()),
            ..Default::default()
        });
        assert!(filters.has_active_filters());
        assert!(filters.to_query(1).contains(&("jobTitle", "dev".to_string())));
    }

    #[test]
    fn salary_bounds_at_the_edges_are_omitted() {
        let filters = SearchFilters {
            min_salary: 0,
            max_salary: SALARY_CEILING,
            ..Default::default()
        };
        assert_eq!(keys(&filters.to_query(2)), ["page", "limit"]);
        assert!(filters.has_active_filters());
    }

    #[test]
    fn update_is_partial_and_reset_restores_defaults() {
        let mut filters = SearchFilters::default();
        filters.update(SearchFiltersUpdate {
            location: Some("Pune".into()),
            job_type: Some("contract".into()),
            ..Default::default()
        });
        assert_eq!(filters.location, "Pune");
        assert_eq!(filters.job_type, "contract");
        assert_eq!(filters.min_salary, DEFAULT_MIN_SALARY);

        filters.reset();
        assert_eq!(filters, SearchFilters::default());
    }

    #[test]
    fn summary_range_rounds_to_thousands() {
        assert_eq!(SearchFilters::default().summary_range(), "₹50k - ₹80k");
        let filters = SearchFilters {
            min_salary: 12_500,
            max_salary: 99_499,
            ..Default::default()
        };
        assert_eq!(filters.summary_range(), "₹13k - ₹99k");
    }
}
