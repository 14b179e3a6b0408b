use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Pre-compiled regex for hostname validation (compiled once at first use)
static HOSTNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][-a-zA-Z0-9\.]*[a-zA-Z0-9]$").unwrap());

#[derive(Debug, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub server: Option<ServerSection>,
    #[serde(default)]
    pub logging: Option<LoggingSection>,
    #[serde(default)]
    pub database: Option<DatabaseSection>,
    #[serde(default)]
    pub cors: Option<CorsSection>,
    #[serde(default)]
    pub pagination: Option<PaginationSection>,
    #[serde(default)]
    pub filters: Option<FiltersSection>,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub json: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSection {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub max_connections: Option<u32>,
    #[serde(default)]
    pub retry_interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CorsSection {
    #[serde(default)]
    pub allowed_origins: Option<Vec<String>>,
    #[serde(default)]
    pub allow_all_origins: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PaginationSection {
    #[serde(default)]
    pub default_limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct FiltersSection {
    #[serde(default)]
    pub numeric_salary: Option<bool>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Load a RawConfigFile from a path. The format is inferred from the extension: .toml, .yaml/.yml, .json
pub fn load_raw_from_file<P: AsRef<Path>>(path: P) -> Result<RawConfigFile, ConfigError> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    parse_config_str(&s, ext.as_deref())
}

#[inline]
fn parse_config_str(s: &str, ext: Option<&str>) -> Result<RawConfigFile, ConfigError> {
    match ext {
        #[cfg(feature = "toml")]
        Some("toml") => toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string())),
        #[cfg(feature = "yaml")]
        Some("yaml" | "yml") => {
            serde_yaml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
        }
        #[cfg(feature = "json")]
        Some("json") => serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string())),
        _ => parse_config_auto(s),
    }
}

/// Try to parse config by attempting each enabled format
#[inline]
fn parse_config_auto(s: &str) -> Result<RawConfigFile, ConfigError> {
    #[cfg(feature = "toml")]
    if let Ok(cfg) = toml::from_str(s) {
        return Ok(cfg);
    }

    #[cfg(feature = "json")]
    if let Ok(cfg) = serde_json::from_str(s) {
        return Ok(cfg);
    }

    #[cfg(feature = "yaml")]
    if let Ok(cfg) = serde_yaml::from_str(s) {
        return Ok(cfg);
    }

    #[cfg(any(feature = "yaml", feature = "toml", feature = "json"))]
    {
        Err(ConfigError::Parse(
            "failed to parse config as any supported format".into(),
        ))
    }

    #[cfg(not(any(feature = "yaml", feature = "toml", feature = "json")))]
    {
        let _ = s;
        Err(ConfigError::Parse("no config format enabled".into()))
    }
}

/// Concrete application configuration with defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub pagination: PaginationConfig,
    pub filters: FiltersConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Seconds between migration attempts while the store is unreachable.
    pub retry_interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_all_origins: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationConfig {
    pub default_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiltersConfig {
    /// Compare salary bounds as integers instead of as text.
    pub numeric_salary: bool,
}

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://jobboard.sqlite";
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: 10,
                retry_interval_secs: 5,
            },
            cors: CorsConfig {
                allowed_origins: Vec::new(),
                allow_all_origins: true,
            },
            pagination: PaginationConfig {
                default_limit: DEFAULT_PAGE_LIMIT,
            },
            filters: FiltersConfig {
                numeric_salary: false,
            },
        }
    }
}

#[inline]
fn parse_bool(s: &str) -> Result<bool, ()> {
    let bytes = s.as_bytes();
    match bytes {
        b"1" | b"true" | b"TRUE" | b"True" | b"yes" | b"YES" | b"Yes" | b"y" | b"Y" => Ok(true),
        b"0" | b"false" | b"FALSE" | b"False" | b"no" | b"NO" | b"No" | b"n" | b"N" => Ok(false),
        _ => match s.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "on" => Ok(true),
            "false" | "no" | "n" | "off" => Ok(false),
            _ => Err(()),
        },
    }
}

#[inline]
fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .filter_map(|p| {
            let trimmed = p.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

/// Helper macro to apply optional value if present
macro_rules! apply_opt {
    ($target:expr, $source:expr) => {
        if let Some(v) = $source {
            $target = v;
        }
    };
}

/// Load concrete `Config` from optional file and environment variables.
/// Environment variables take precedence over file values and defaults.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<Config, ConfigError> {
    let mut cfg = Config::default();

    if let Some(p) = path {
        let raw = load_raw_from_file(p)?;
        apply_raw(&mut cfg, raw);
    }

    apply_env_overrides(&mut cfg)?;

    Ok(cfg)
}

fn apply_raw(cfg: &mut Config, raw: RawConfigFile) {
    if let Some(server) = raw.server {
        apply_opt!(cfg.server.host, server.host);
        apply_opt!(cfg.server.port, server.port);
    }
    if let Some(logging) = raw.logging {
        apply_opt!(cfg.logging.level, logging.level);
        apply_opt!(cfg.logging.json, logging.json);
    }
    if let Some(db) = raw.database {
        apply_opt!(cfg.database.url, db.url);
        apply_opt!(cfg.database.max_connections, db.max_connections);
        apply_opt!(cfg.database.retry_interval_secs, db.retry_interval_secs);
    }
    if let Some(cors) = raw.cors {
        apply_opt!(cfg.cors.allowed_origins, cors.allowed_origins);
        apply_opt!(cfg.cors.allow_all_origins, cors.allow_all_origins);
    }
    if let Some(pagination) = raw.pagination {
        apply_opt!(cfg.pagination.default_limit, pagination.default_limit);
    }
    if let Some(filters) = raw.filters {
        apply_opt!(cfg.filters.numeric_salary, filters.numeric_salary);
    }
}

#[inline]
fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(v) => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Parse(format!("invalid {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

#[inline]
fn env_bool(key: &str) -> Result<Option<bool>, ConfigError> {
    match env::var(key) {
        Ok(v) => parse_bool(v.trim())
            .map(Some)
            .map_err(|_| ConfigError::Parse(format!("invalid {}", key))),
        Err(_) => Ok(None),
    }
}

#[inline]
fn env_str(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn apply_env_overrides(cfg: &mut Config) -> Result<(), ConfigError> {
    // Bare names first so the prefixed ones win.
    if let Some(v) = env_parse::<u16>("PORT")? {
        cfg.server.port = v;
    }
    if let Some(v) = env_str("DATABASE_URL") {
        cfg.database.url = v;
    }

    // Server
    if let Some(v) = env_str("JOBBOARD_SERVER_HOST") {
        cfg.server.host = v;
    }
    if let Some(v) = env_parse::<u16>("JOBBOARD_SERVER_PORT")? {
        cfg.server.port = v;
    }

    // Logging
    if let Some(v) = env_str("JOBBOARD_LOG_LEVEL") {
        cfg.logging.level = v;
    }
    if let Some(v) = env_bool("JOBBOARD_LOG_JSON")? {
        cfg.logging.json = v;
    }

    // Database
    if let Some(v) = env_str("JOBBOARD_DATABASE_URL") {
        cfg.database.url = v;
    }
    if let Some(v) = env_parse::<u32>("JOBBOARD_DB_MAX_CONNECTIONS")? {
        cfg.database.max_connections = v;
    }
    if let Some(v) = env_parse::<u64>("JOBBOARD_DB_RETRY_INTERVAL_SECS")? {
        cfg.database.retry_interval_secs = v;
    }

    // CORS
    if let Some(v) = env_str("JOBBOARD_CORS_ALLOWED_ORIGINS") {
        cfg.cors.allowed_origins = split_csv(&v);
    }
    if let Some(v) = env_bool("JOBBOARD_CORS_ALLOW_ALL_ORIGINS")? {
        cfg.cors.allow_all_origins = v;
    }

    // Listing
    if let Some(v) = env_parse::<u32>("JOBBOARD_DEFAULT_PAGE_LIMIT")? {
        cfg.pagination.default_limit = v;
    }
    if let Some(v) = env_bool("JOBBOARD_NUMERIC_SALARY_FILTER")? {
        cfg.filters.numeric_salary = v;
    }

    Ok(())
}

/// Validate higher-level constraints on the resolved configuration.
pub fn validate_config(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.server.port == 0 {
        return Err(ConfigError::Validation("server.port must be > 0".into()));
    }
    let host_ok = cfg.server.host.parse::<std::net::IpAddr>().is_ok()
        || HOSTNAME_REGEX.is_match(&cfg.server.host);
    if !host_ok {
        return Err(ConfigError::Validation(format!(
            "invalid server.host: {}",
            cfg.server.host
        )));
    }

    let url_lower = cfg.database.url.trim().to_ascii_lowercase();
    if url_lower.is_empty() {
        return Err(ConfigError::Validation("database.url must be set".into()));
    }
    if !(url_lower.starts_with("sqlite:")
        || url_lower.starts_with("postgres:")
        || url_lower.starts_with("postgresql:"))
    {
        return Err(ConfigError::Validation(format!(
            "unsupported database url scheme: {}",
            cfg.database.url.split(':').next().unwrap_or_default()
        )));
    }
    if cfg.database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be > 0".into(),
        ));
    }
    if cfg.database.retry_interval_secs == 0 {
        return Err(ConfigError::Validation(
            "database.retry_interval_secs must be > 0".into(),
        ));
    }
    if cfg.pagination.default_limit == 0 {
        return Err(ConfigError::Validation(
            "pagination.default_limit must be > 0".into(),
        ));
    }

    for origin in &cfg.cors.allowed_origins {
        if origin == "*" {
            continue;
        }
        match url::Url::parse(origin) {
            Ok(u) => {
                let scheme = u.scheme();
                if scheme != "http" && scheme != "https" {
                    return Err(ConfigError::Validation(format!(
                        "CORS origin must be http or https: {}",
                        origin
                    )));
                }
            }
            Err(_) => {
                return Err(ConfigError::Validation(format!(
                    "invalid CORS origin: {}",
                    origin
                )))
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn parse_toml() {
        let f = NamedTempFile::new().expect("tmpfile");
        std::fs::write(
            f.path(),
            r#"
[server]
host = "127.0.0.1"
port = 6000

[database]
url = "sqlite://jobs.db"
max_connections = 4
"#,
        )
        .unwrap();
        let cfg = load_raw_from_file(f.path()).expect("load");
        let s = cfg.server.expect("server section");
        assert_eq!(s.host.unwrap(), "127.0.0.1");
        assert_eq!(s.port.unwrap(), 6000);
        let db = cfg.database.expect("database section");
        assert_eq!(db.url.unwrap(), "sqlite://jobs.db");
        assert_eq!(db.max_connections, Some(4));
    }

    #[test]
    fn parse_yaml() {
        let f = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("tmpfile");
        std::fs::write(
            f.path(),
            r#"
server:
  host: 0.0.0.0
  port: 9000
filters:
  numeric_salary: true
"#,
        )
        .unwrap();
        let cfg = load_raw_from_file(f.path()).expect("load");
        assert_eq!(cfg.server.unwrap().port.unwrap(), 9000);
        assert_eq!(cfg.filters.unwrap().numeric_salary, Some(true));
    }

    #[test]
    fn file_values_layer_over_defaults() {
        let mut cfg = Config::default();
        let raw: RawConfigFile = serde_json::from_str(
            r#"{"pagination": {"default_limit": 25}, "cors": {"allow_all_origins": false}}"#,
        )
        .unwrap();
        apply_raw(&mut cfg, raw);
        assert_eq!(cfg.pagination.default_limit, 25);
        assert!(!cfg.cors.allow_all_origins);
        assert_eq!(cfg.server.port, DEFAULT_PORT);
        assert_eq!(cfg.database.url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn env_overrides() {
        let keys = [
            "PORT",
            "DATABASE_URL",
            "JOBBOARD_SERVER_PORT",
            "JOBBOARD_DATABASE_URL",
            "JOBBOARD_LOG_LEVEL",
            "JOBBOARD_NUMERIC_SALARY_FILTER",
        ];
        for k in &keys {
            std::env::remove_var(k);
        }

        std::env::set_var("PORT", "7000");
        std::env::set_var("DATABASE_URL", "postgres://db/jobs");
        let cfg = load_config::<&Path>(None).expect("load config");
        assert_eq!(cfg.server.port, 7000);
        assert_eq!(cfg.database.url, "postgres://db/jobs");

        std::env::set_var("JOBBOARD_SERVER_PORT", "1234");
        std::env::set_var("JOBBOARD_DATABASE_URL", "sqlite::memory:");
        std::env::set_var("JOBBOARD_LOG_LEVEL", "debug");
        std::env::set_var("JOBBOARD_NUMERIC_SALARY_FILTER", "yes");
        let cfg = load_config::<&Path>(None).expect("load config");
        assert_eq!(cfg.server.port, 1234);
        assert_eq!(cfg.database.url, "sqlite::memory:");
        assert_eq!(cfg.logging.level, "debug");
        assert!(cfg.filters.numeric_salary);

        for k in &keys {
            std::env::remove_var(k);
        }
    }

    #[test]
    fn csv_split() {
        let parts = split_csv("https://a.example, https://b.example, , https://c.example");
        assert_eq!(
            parts,
            vec!["https://a.example", "https://b.example", "https://c.example"]
        );
    }

    #[test]
    fn validation_rejects_bad_values() {
        assert!(validate_config(&Config::default()).is_ok());

        let mut cfg = Config::default();
        cfg.database.url = "mongodb://localhost/jobboard".into();
        assert!(matches!(
            validate_config(&cfg),
            Err(ConfigError::Validation(_))
        ));

        let mut cfg = Config::default();
        cfg.pagination.default_limit = 0;
        assert!(validate_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.cors.allowed_origins = vec!["ftp://files.example".into()];
        assert!(validate_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.server.host = "bad host!".into();
        assert!(validate_config(&cfg).is_err());
    }
}
