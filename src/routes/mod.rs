//! Route definitions for the dashboard client API.

pub mod client;
pub mod health;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(state.config.frontend_url.as_deref());

    let client_routes = Router::new()
        .route("/products", get(client::products))
        .route("/customers", get(client::customers))
        .route("/transactions", get(client::transactions))
        .route("/geography", get(client::geography));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/client", client_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match frontend_url.and_then(|url| HeaderValue::from_str(url).ok()) {
        Some(origin) => layer.allow_origin(origin),
        None => layer.allow_origin(Any),
    }
}
