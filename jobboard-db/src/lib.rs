#[cfg(not(any(feature = "postgres", feature = "sqlite")))]
compile_error!("Enable exactly one of the `postgres` or `sqlite` features for jobboard-db.");

#[cfg(all(feature = "postgres", feature = "sqlite"))]
compile_error!("Activate only one backend feature (`postgres` or `sqlite`) for jobboard-db.");

#[cfg(feature = "postgres")]
pub type DbBackend = sqlx::Postgres;
#[cfg(feature = "sqlite")]
pub type DbBackend = sqlx::Sqlite;

pub mod filter;
pub mod jobs;
pub mod models;

pub use filter::{fold_case, parse_leading_int, JobFilter, Predicate, SalaryComparison};
pub use jobs::PageRequest;
pub use models::{format_timestamp, JobType, JobsRow, NewJob, UnknownJobType};

pub use jobboard_db_connection::utils::sanitize_database_url;
pub use jobboard_db_connection::{
    create_lazy_pool, create_pool, DbConnectionConfig, DbConnectionError, DbPool,
};
