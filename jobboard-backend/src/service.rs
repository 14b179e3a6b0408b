//! Job posting operations independent of the HTTP layer.

use std::collections::HashMap;
use std::sync::Arc;

use jobboard_db::jobs as db_jobs;
use jobboard_db::{parse_leading_int, DbPool, JobFilter, JobsRow, PageRequest, Predicate, SalaryComparison};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::handlers::jobs::dto::CreateJobDto;
use crate::validation::ValidationIssue;

#[derive(Debug, Error)]
pub enum JobServiceError {
    #[error("job validation failed")]
    Validation(Vec<ValidationIssue>),
    #[error("job not found")]
    NotFound,
    #[error("'{0}' is not a valid job id")]
    InvalidId(String),
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

/// Listing behaviour taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOptions {
    pub default_limit: u32,
    pub salary_comparison: SalaryComparison,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            default_limit: jobboard_config::DEFAULT_PAGE_LIMIT,
            salary_comparison: SalaryComparison::Text,
        }
    }
}

impl ListingOptions {
    pub fn from_config(cfg: &jobboard_config::Config) -> Self {
        Self {
            default_limit: cfg.pagination.default_limit,
            salary_comparison: if cfg.filters.numeric_salary {
                SalaryComparison::Numeric
            } else {
                SalaryComparison::Text
            },
        }
    }
}

/// Raw list parameters. `page` and `limit` keep their query-string form
/// and are interpreted leniently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub filter: JobFilter,
}

impl ListQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let get = |key: &str| params.get(key).cloned();
        Self {
            page: get("page"),
            limit: get("limit"),
            filter: JobFilter {
                job_title: get("jobTitle"),
                location: get("location"),
                job_type: get("jobType"),
                min_salary: get("minSalary"),
                max_salary: get("maxSalary"),
            },
        }
    }

    /// Requested page, 1 when absent or not a positive integer.
    pub fn page(&self) -> u32 {
        positive_or(self.page.as_deref(), 1)
    }

    /// Requested page size, `default` when absent or not a positive integer.
    pub fn limit(&self, default: u32) -> u32 {
        positive_or(self.limit.as_deref(), default)
    }
}

fn positive_or(raw: Option<&str>, fallback: u32) -> u32 {
    raw.and_then(parse_leading_int)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0)
        .unwrap_or(fallback)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Page that was served.
    pub current: u32,
    /// Total number of pages.
    pub total: u64,
    /// Rows on this page.
    pub count: usize,
    pub total_jobs: u64,
}

impl Pagination {
    pub fn new(current: u32, limit: u32, count: usize, total_jobs: u64) -> Self {
        Self {
            current,
            total: total_jobs.div_ceil(u64::from(limit.max(1))),
            count,
            total_jobs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPage {
    pub jobs: Vec<JobsRow>,
    pub pagination: Pagination,
}

/// Create, list, fetch and search job postings.
#[derive(Clone)]
pub struct JobService {
    pool: Arc<DbPool>,
    options: ListingOptions,
}

impl JobService {
    pub fn new(pool: Arc<DbPool>, options: ListingOptions) -> Self {
        Self { pool, options }
    }

    pub fn options(&self) -> ListingOptions {
        self.options
    }

    pub async fn create(&self, dto: CreateJobDto) -> Result<JobsRow, JobServiceError> {
        let new_job = dto.validate().map_err(JobServiceError::Validation)?;
        let row = db_jobs::insert_job(&*self.pool, &new_job).await?;
        tracing::info!(job_id = %row.id, job_type = %row.job_type, "job created");
        Ok(row)
    }

    pub async fn list(&self, query: &ListQuery) -> Result<JobPage, JobServiceError> {
        let page = query.page();
        let limit = query.limit(self.options.default_limit);
        let predicate = query.filter.to_predicate(self.options.salary_comparison);
        tracing::debug!(?predicate, page, limit, "listing jobs");

        let jobs = db_jobs::find_page(&*self.pool, &predicate, PageRequest::for_page(page, limit)).await?;
        let total_jobs = db_jobs::count_matching(&*self.pool, &predicate).await?;
        let total_jobs = u64::try_from(total_jobs).unwrap_or_default();

        Ok(JobPage {
            pagination: Pagination::new(page, limit, jobs.len(), total_jobs),
            jobs,
        })
    }

    /// Fetch one posting. An id that is not a UUID is reported as
    /// [`JobServiceError::InvalidId`], distinct from an unknown id.
    pub async fn get(&self, raw_id: &str) -> Result<JobsRow, JobServiceError> {
        let id = Uuid::parse_str(raw_id).map_err(|_| JobServiceError::InvalidId(raw_id.to_string()))?;
        db_jobs::find_by_id(&*self.pool, &id)
            .await?
            .ok_or(JobServiceError::NotFound)
    }

    /// Case-insensitive substring search over title, company, location and
    /// description; unpaginated, newest first.
    pub async fn search(&self, query: &str) -> Result<Vec<JobsRow>, JobServiceError> {
        let rows = db_jobs::find_all(&*self.pool, &Predicate::text_search(query)).await?;
        Ok(rows)
    }

    /// Round-trip to the store, used by the readiness check.
    pub async fn ping(&self) -> Result<(), JobServiceError> {
        sqlx::query("SELECT 1").execute(&*self.pool).await?;
        Ok(())
    }
}
