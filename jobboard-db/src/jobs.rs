// Queries over the `jobs` table. Every function takes any executor so
// callers can pass a pool, a pooled connection or a transaction.

use chrono::Utc;
use sqlx::{Executor, QueryBuilder};
use uuid::Uuid;

use crate::filter::{fold_case, Predicate};
use crate::models::{format_timestamp, JobsRow, NewJob};
use crate::DbBackend;

const JOB_COLUMNS: &str = "seq, id, job_title, company_name, location, job_type, salary_from, \
     salary_to, job_description, requirements, responsibilities, application_deadline, created_at";

/// Newest first; `seq` separates rows created within the same millisecond.
const NEWEST_FIRST: &str = " ORDER BY created_at DESC, seq DESC";

/// A window into an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u64,
}

impl PageRequest {
    /// Window for a 1-indexed page number.
    pub fn for_page(page: u32, limit: u32) -> Self {
        Self {
            limit,
            offset: u64::from(page.saturating_sub(1)) * u64::from(limit),
        }
    }
}

/// Insert a posting, assigning its identifier and creation timestamp, and
/// return the stored row.
pub async fn insert_job<'e, E>(executor: E, job: &NewJob) -> Result<JobsRow, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    let mut qb = QueryBuilder::<DbBackend>::new(
        "INSERT INTO jobs (id, job_title, company_name, location, job_type, salary_from, \
         salary_to, job_description, requirements, responsibilities, application_deadline, \
         created_at, job_title_folded, company_name_folded, location_folded, \
         job_description_folded) VALUES (",
    );
    let mut values = qb.separated(", ");
    values.push_bind(Uuid::new_v4().to_string());
    values.push_bind(job.job_title.clone());
    values.push_bind(job.company_name.clone());
    values.push_bind(job.location.clone());
    values.push_bind(job.job_type.as_str());
    values.push_bind(job.salary_from.clone());
    values.push_bind(job.salary_to.clone());
    values.push_bind(job.job_description.clone());
    values.push_bind(job.requirements.clone());
    values.push_bind(job.responsibilities.clone());
    values.push_bind(format_timestamp(job.application_deadline));
    values.push_bind(format_timestamp(Utc::now()));
    values.push_bind(fold_case(&job.job_title));
    values.push_bind(fold_case(&job.company_name));
    values.push_bind(fold_case(&job.location));
    values.push_bind(fold_case(&job.job_description));
    qb.push(") RETURNING ");
    qb.push(JOB_COLUMNS);

    qb.build_query_as::<JobsRow>().fetch_one(executor).await
}

pub async fn find_by_id<'e, E>(executor: E, id: &Uuid) -> Result<Option<JobsRow>, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    let mut qb = QueryBuilder::<DbBackend>::new(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = "));
    qb.push_bind(id.to_string());
    qb.build_query_as::<JobsRow>().fetch_optional(executor).await
}

/// One page of the rows matching `predicate`, newest first.
pub async fn find_page<'e, E>(
    executor: E,
    predicate: &Predicate,
    page: PageRequest,
) -> Result<Vec<JobsRow>, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    let mut qb = QueryBuilder::<DbBackend>::new(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE "));
    predicate.push_to(&mut qb);
    qb.push(NEWEST_FIRST);
    qb.push(" LIMIT ");
    qb.push_bind(i64::from(page.limit));
    qb.push(" OFFSET ");
    qb.push_bind(i64::try_from(page.offset).unwrap_or(i64::MAX));
    qb.build_query_as::<JobsRow>().fetch_all(executor).await
}

/// Number of rows matching `predicate`, independent of any page window.
pub async fn count_matching<'e, E>(executor: E, predicate: &Predicate) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    let mut qb = QueryBuilder::<DbBackend>::new("SELECT COUNT(*) FROM jobs WHERE ");
    predicate.push_to(&mut qb);
    qb.build_query_scalar::<i64>().fetch_one(executor).await
}

/// Every row matching `predicate`, newest first, unpaginated.
pub async fn find_all<'e, E>(executor: E, predicate: &Predicate) -> Result<Vec<JobsRow>, sqlx::Error>
where
    E: Executor<'e, Database = DbBackend>,
{
    let mut qb = QueryBuilder::<DbBackend>::new(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE "));
    predicate.push_to(&mut qb);
    qb.push(NEWEST_FIRST);
    qb.build_query_as::<JobsRow>().fetch_all(executor).await
}
