use std::env::{self, VarError};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::DbConnectionError;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;
const DEFAULT_TEST_BEFORE_ACQUIRE: bool = true;

/// Basic configuration for creating a SQLx connection pool.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DbConnectionConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: Option<u64>,
    pub test_before_acquire: bool,
}

impl Default for DbConnectionConfig {
    #[inline]
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            idle_timeout_secs: Some(DEFAULT_IDLE_TIMEOUT_SECS),
            test_before_acquire: DEFAULT_TEST_BEFORE_ACQUIRE,
        }
    }
}

impl DbConnectionConfig {
    /// Creates a new configuration with the provided URL and sane defaults.
    #[inline]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        if self.min_connections > max {
            self.min_connections = max;
        }
        self
    }

    /// Loads configuration from environment variables using the supplied prefix.
    ///
    /// Expected variables:
    /// - `{PREFIX}_DATABASE_URL` (required)
    /// - `{PREFIX}_DB_MAX_CONNECTIONS` (optional)
    /// - `{PREFIX}_DB_MIN_CONNECTIONS` (optional)
    /// - `{PREFIX}_DB_CONNECT_TIMEOUT_SECS` (optional)
    /// - `{PREFIX}_DB_IDLE_TIMEOUT_SECS` (optional)
    /// - `{PREFIX}_DB_TEST_BEFORE_ACQUIRE` (optional, bool)
    pub fn from_env(prefix: &str) -> Result<Self, DbConnectionError> {
        let url_var = format!("{prefix}_DATABASE_URL");
        let url =
            env::var(&url_var).map_err(|_| DbConnectionError::MissingEnvVar(url_var.clone()))?;
        if url.trim().is_empty() {
            return Err(DbConnectionError::EmptyDatabaseUrl);
        }

        let mut config = Self::new(url);

        if let Some(max) = parse_env_var::<u32>(prefix, "DB_MAX_CONNECTIONS")? {
            config.max_connections = max;
        }
        if let Some(min) = parse_env_var::<u32>(prefix, "DB_MIN_CONNECTIONS")? {
            config.min_connections = min;
        }
        config.validate_sizes(prefix)?;

        if let Some(secs) = parse_env_var::<u64>(prefix, "DB_CONNECT_TIMEOUT_SECS")? {
            config.connect_timeout_secs = secs;
        }
        if let Some(secs) = parse_env_var::<u64>(prefix, "DB_IDLE_TIMEOUT_SECS")? {
            config.idle_timeout_secs = Some(secs);
        }
        if let Some(value) = parse_env_bool(prefix, "DB_TEST_BEFORE_ACQUIRE")? {
            config.test_before_acquire = value;
        }

        Ok(config)
    }

    fn validate_sizes(&self, prefix: &str) -> Result<(), DbConnectionError> {
        if self.max_connections == 0 {
            return Err(DbConnectionError::InvalidPoolSize {
                var: format!("{prefix}_DB_MAX_CONNECTIONS"),
                reason: "max_connections must be greater than 0",
            });
        }
        if self.min_connections > self.max_connections {
            return Err(DbConnectionError::InvalidPoolSize {
                var: format!("{prefix}_DB_MIN_CONNECTIONS"),
                reason: "min_connections must not exceed max_connections",
            });
        }
        Ok(())
    }

    #[inline]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[inline]
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs.map(Duration::from_secs)
    }

    /// Whether the URL points at a SQLite database that lives only in memory.
    pub fn is_in_memory(&self) -> bool {
        let url = self.url.to_ascii_lowercase();
        url.starts_with("sqlite:")
            && SQLITE_MEMORY_PATTERNS
                .iter()
                .any(|pattern| url.contains(pattern))
    }
}

/// SQLite DSN fragments that denote an in-memory database.
pub const SQLITE_MEMORY_PATTERNS: &[&str] = &[":memory:", "mode=memory"];

fn read_env(prefix: &str, suffix: &str) -> Result<Option<(String, String)>, DbConnectionError> {
    let var_name = format!("{prefix}_{suffix}");
    match env::var(&var_name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some((var_name, trimmed.to_owned())))
            }
        }
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(DbConnectionError::InvalidUnicode(var_name)),
    }
}

fn parse_env_var<T>(prefix: &str, suffix: &str) -> Result<Option<T>, DbConnectionError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    let Some((var, value)) = read_env(prefix, suffix)? else {
        return Ok(None);
    };
    value
        .parse::<T>()
        .map(Some)
        .map_err(|source| DbConnectionError::InvalidNumber { var, source })
}

fn parse_env_bool(prefix: &str, suffix: &str) -> Result<Option<bool>, DbConnectionError> {
    let Some((var, value)) = read_env(prefix, suffix)? else {
        return Ok(None);
    };
    match value.as_bytes() {
        b"1" | b"true" | b"TRUE" | b"yes" | b"YES" | b"on" | b"ON" => Ok(Some(true)),
        b"0" | b"false" | b"FALSE" | b"no" | b"NO" | b"off" | b"OFF" => Ok(Some(false)),
        _ => Err(DbConnectionError::InvalidBoolean { var, value }),
    }
}
