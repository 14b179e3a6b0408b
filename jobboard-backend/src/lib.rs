pub mod app;
pub mod error;
pub mod handlers;
pub mod service;
pub mod state;
pub mod validation;

pub use app::{build_router, build_router_with_cors, cors_layer};
