use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Extension};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use jobboard_config::CorsConfig;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{health, jobs};
use crate::state::AppState;

// Request bodies are small JSON documents.
const DEFAULT_BODY_LIMIT: usize = 100 * 1024;

/// Build the primary axum router with the provided shared application state.
///
/// Uses a CORS policy that admits any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    build_router_with_cors(state, cors_layer(&jobboard_config::Config::default().cors))
}

pub fn build_router_with_cors(state: Arc<AppState>, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/jobs", post(jobs::create::create).get(jobs::list::list))
        .route("/jobs/search/{query}", get(jobs::search::search))
        .route("/jobs/{id}", get(jobs::get_by_id::get_by_id))
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
        .layer(Extension(state));

    Router::new()
        .nest("/api", api)
        .fallback(health::route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Translate the CORS section of the configuration into a layer.
///
/// Origins that are not valid header values are skipped with a warning.
/// A `"*"` entry admits every origin. With `allow_all_origins` off and no
/// origins listed, no cross-origin request is admitted.
pub fn cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if cfg.allow_all_origins || cfg.allowed_origins.iter().any(|o| o.trim() == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = cfg
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(error) => {
                tracing::warn!(%origin, %error, "ignoring unusable CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
