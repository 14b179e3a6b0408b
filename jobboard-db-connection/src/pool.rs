#[cfg(feature = "postgres")]
use sqlx::postgres::{PgPool, PgPoolOptions};
#[cfg(feature = "sqlite")]
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::DbConnectionConfig;
use crate::error::DbConnectionError;
use crate::utils::sanitize_database_url;

#[cfg(not(any(feature = "postgres", feature = "sqlite")))]
compile_error!(
    "Enable exactly one of the `postgres` or `sqlite` features for jobboard-db-connection."
);

#[cfg(all(feature = "postgres", feature = "sqlite"))]
compile_error!("Activate only one backend feature (`postgres` or `sqlite`) for jobboard-db-connection.");

#[cfg(feature = "postgres")]
pub type DbPool = PgPool;
#[cfg(feature = "sqlite")]
pub type DbPool = SqlitePool;

#[cfg(feature = "postgres")]
type DbPoolOptions = PgPoolOptions;
#[cfg(feature = "sqlite")]
type DbPoolOptions = SqlitePoolOptions;

/// Creates a new backend-specific connection pool, connecting eagerly.
pub async fn create_pool(config: &DbConnectionConfig) -> Result<DbPool, DbConnectionError> {
    let url = checked_url(config)?;

    #[cfg(feature = "sqlite")]
    ensure_sqlite_db_file_exists(url)?;

    let pool = pool_options(config).connect(url).await?;
    tracing::debug!(
        db_url = %sanitize_database_url(url),
        max_connections = config.max_connections,
        "database pool connected"
    );
    Ok(pool)
}

/// Creates a pool that defers connecting until the first acquire.
///
/// Used when the store is unreachable at startup: the process keeps
/// serving and each request retries the connection.
pub fn create_lazy_pool(config: &DbConnectionConfig) -> Result<DbPool, DbConnectionError> {
    let url = checked_url(config)?;
    pool_options(config).connect_lazy(url).map_err(Into::into)
}

fn checked_url(config: &DbConnectionConfig) -> Result<&str, DbConnectionError> {
    let url = config.url.trim();
    if url.is_empty() {
        return Err(DbConnectionError::EmptyDatabaseUrl);
    }
    Ok(url)
}

fn pool_options(config: &DbConnectionConfig) -> DbPoolOptions {
    // Every connection to `sqlite::memory:` opens its own private database,
    // so in-memory pools hold exactly one connection that never expires.
    if config.is_in_memory() {
        return DbPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let mut opts = DbPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout())
        .test_before_acquire(config.test_before_acquire);

    if let Some(idle) = config.idle_timeout() {
        opts = opts.idle_timeout(idle);
    }
    opts
}

/// Extract the file path from a SQLite connection URL.
/// Returns None for in-memory databases or empty paths.
#[cfg(feature = "sqlite")]
pub(crate) fn sqlite_file_path(url: &str) -> Option<&str> {
    let lower = url.to_ascii_lowercase();
    if crate::config::SQLITE_MEMORY_PATTERNS
        .iter()
        .any(|pattern| lower.contains(pattern))
    {
        return None;
    }

    let mut path = url;
    path = path
        .strip_prefix("sqlite://")
        .or_else(|| path.strip_prefix("sqlite:"))
        .unwrap_or(path);
    path = path.strip_prefix("file:").unwrap_or(path);

    if let Some(idx) = path.find('?') {
        path = &path[..idx];
    }

    let path = path.trim();
    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}

#[cfg(feature = "sqlite")]
fn ensure_sqlite_db_file_exists(database_url: &str) -> Result<(), DbConnectionError> {
    use std::fs::{create_dir_all, File};
    use std::io;
    use std::path::Path;

    let Some(clean_path) = sqlite_file_path(database_url) else {
        return Ok(());
    };

    let db_path = Path::new(clean_path);
    if let Some(parent) = db_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty() && !p.exists())
    {
        create_dir_all(parent).map_err(|e| {
            DbConnectionError::FileCreation(format!(
                "failed to create parent directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    if !db_path.exists() {
        File::create(db_path).map_err(|e| {
            let msg = if e.kind() == io::ErrorKind::PermissionDenied {
                format!("permission denied creating '{}': {e}", db_path.display())
            } else {
                format!("failed to create DB file '{}': {e}", db_path.display())
            };
            DbConnectionError::FileCreation(msg)
        })?;
    }

    Ok(())
}
