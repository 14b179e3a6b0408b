use std::sync::Arc;

use crate::service::{JobService, ListingOptions};

/// Shared application state passed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub jobs: JobService,
}

impl AppState {
    pub fn new(db_pool: jobboard_db::DbPool, options: ListingOptions) -> Self {
        Self {
            jobs: JobService::new(Arc::new(db_pool), options),
        }
    }
}
