use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::EnvFilter;

/// Initialize tracing from configuration. `RUST_LOG` wins over the
/// configured level when set.
pub fn install_tracing_from_config(cfg: &jobboard_config::LoggingConfig) {
    let env_filter_str = std::env::var("RUST_LOG").unwrap_or_else(|_| cfg.level.clone());
    let env_filter = EnvFilter::try_new(&env_filter_str).unwrap_or_else(|error| {
        eprintln!("invalid log filter '{env_filter_str}' ({error}), using 'info'");
        EnvFilter::new("info")
    });

    if cfg.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_timer(ChronoUtc::rfc_3339())
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(ChronoUtc::rfc_3339())
            .init();
    }
}
