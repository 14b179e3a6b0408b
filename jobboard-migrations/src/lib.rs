use sqlx::migrate::Migrator;

pub static SQLITE_MIGRATOR: Migrator = sqlx_macros::migrate!("src/migrations_sqlite");
pub static POSTGRES_MIGRATOR: Migrator = sqlx_macros::migrate!("src/migrations_postgres");

pub fn sqlite_migrator() -> &'static Migrator {
    &SQLITE_MIGRATOR
}

pub fn postgres_migrator() -> &'static Migrator {
    &POSTGRES_MIGRATOR
}

/// Pick the migrator matching the scheme of a connection URL.
pub fn migrator_for_url(url: &str) -> &'static Migrator {
    let lower = url.trim().to_ascii_lowercase();
    if lower.starts_with("postgres:") || lower.starts_with("postgresql:") {
        postgres_migrator()
    } else {
        sqlite_migrator()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_migrator_by_scheme() {
        assert!(std::ptr::eq(
            migrator_for_url("postgres://db/jobs"),
            postgres_migrator()
        ));
        assert!(std::ptr::eq(
            migrator_for_url("sqlite::memory:"),
            sqlite_migrator()
        ));
    }

    #[test]
    fn both_backends_ship_the_same_migrations() {
        assert_eq!(SQLITE_MIGRATOR.iter().count(), 2);
        assert_eq!(POSTGRES_MIGRATOR.iter().count(), 2);
    }
}
