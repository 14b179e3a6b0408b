use std::time::Duration;

use jobboard_db::{sanitize_database_url, DbConnectionConfig, DbPool};

/// Apply the migrator matching the database URL.
pub async fn run_migrations(db_cfg: &DbConnectionConfig, db_pool: &DbPool) -> anyhow::Result<()> {
    let migrator = jobboard_migrations::migrator_for_url(&db_cfg.url);
    tracing::info!(
        db_url = %sanitize_database_url(&db_cfg.url),
        migrations = migrator.iter().count(),
        "applying database migrations"
    );
    match migrator.run(db_pool).await {
        Ok(()) => {
            tracing::info!("database migrations applied successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!(%e, "failed to apply database migrations");
            Err(anyhow::anyhow!("failed to apply database migrations: {e}"))
        }
    }
}

/// Keep retrying migrations in the background until they succeed.
///
/// Requests made meanwhile fail with the store's error and are reported
/// through the usual 500 envelopes.
pub fn spawn_migration_retry(db_cfg: DbConnectionConfig, db_pool: DbPool, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        let mut attempt: u32 = 1;
        loop {
            ticker.tick().await;
            attempt += 1;
            tracing::info!(attempt, "retrying database setup");
            if run_migrations(&db_cfg, &db_pool).await.is_ok() {
                break;
            }
        }
    });
}
