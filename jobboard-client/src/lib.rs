//! Typed HTTP client for the job board API, plus the search-filter state
//! a front end keeps between requests.

pub mod client;
pub mod error;
pub mod filters;
pub mod form;
pub mod models;

pub use client::JobBoardClient;
pub use error::ClientError;
pub use filters::{SearchFilters, SearchFiltersUpdate, PAGE_SIZE};
pub use form::JobForm;
pub use models::{AppliedFilters, HealthStatus, Job, JobsPage, Pagination, SearchResults};
