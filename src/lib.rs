pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod store;

use store::Store;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Store,
    pub config: config::AppConfig,
}
