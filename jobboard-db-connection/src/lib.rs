pub mod config;
pub mod error;
pub mod pool;
#[cfg(test)]
mod test;
pub mod utils;

// Re-exports for public API
pub use config::DbConnectionConfig;
pub use error::DbConnectionError;
pub use pool::{create_lazy_pool, create_pool, DbPool};
