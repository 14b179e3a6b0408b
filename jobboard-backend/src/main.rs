//! Job board backend server
//!
//! Entry point with configuration loading, database setup and HTTP server
//! startup.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use jobboard_backend::service::ListingOptions;
use jobboard_backend::state::AppState;

mod bootstrap;
mod cli;
mod config_helpers;
mod tracing_setup;

use bootstrap::{run_migrations, spawn_migration_retry};
use cli::CliArgs;
use config_helpers::{database_config_from_config, parse_bind_address};
use tracing_setup::install_tracing_from_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();

    let config = jobboard_config::load_config(args.config_path.as_deref())
        .map_err(|e| anyhow::anyhow!("failed to load configuration: {e}"))?;
    jobboard_config::validate_config(&config)
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    install_tracing_from_config(&config.logging);
    tracing::info!(
        config_path = ?args.config_path,
        default_page_limit = config.pagination.default_limit,
        numeric_salary_filter = config.filters.numeric_salary,
        "configuration loaded"
    );

    let db_cfg = database_config_from_config(&config);
    let db_pool = match jobboard_db::create_pool(&db_cfg).await {
        Ok(pool) => {
            if run_migrations(&db_cfg, &pool).await.is_err() {
                spawn_migration_retry(db_cfg.clone(), pool.clone(), retry_interval(&config));
            }
            pool
        }
        Err(error) => {
            // Keep serving: health stays up, data endpoints report the
            // store's error until it becomes reachable.
            tracing::error!(%error, "database unreachable at startup, continuing without it");
            let pool = jobboard_db::create_lazy_pool(&db_cfg)?;
            spawn_migration_retry(db_cfg.clone(), pool.clone(), retry_interval(&config));
            pool
        }
    };

    tracing::info!(
        db_url = %jobboard_db::sanitize_database_url(&db_cfg.url),
        db_max_connections = db_cfg.max_connections,
        "database configuration"
    );

    let state = Arc::new(AppState::new(db_pool, ListingOptions::from_config(&config)));
    let app = jobboard_backend::build_router_with_cors(
        state,
        jobboard_backend::cors_layer(&config.cors),
    );

    let addr = parse_bind_address(&config.server.host, config.server.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn retry_interval(config: &jobboard_config::Config) -> Duration {
    Duration::from_secs(config.database.retry_interval_secs)
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
