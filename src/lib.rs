use axum::{extract::DefaultBodyLimit, Router};
use std::sync::Arc;
use tower_http::compression::{predicate::SizeAbove, CompressionLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod middleware;
pub mod models;
pub mod monitoring;
pub mod security;
pub mod state;
pub mod utils;

use api::common::handle_not_found;
use api::create_api_router;
use monitoring::endpoints::monitoring_router;
use security::{get_cors_layer, security_headers_middleware};
use state::AppState;

use axum::middleware as axum_middleware;

pub fn create_app_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        // Health/readiness endpoints (no authentication)
        .merge(monitoring_router())
        // API endpoints
        .merge(create_api_router())
        // Unknown routes get a JSON envelope instead of an empty 404
        .fallback(handle_not_found)
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(
            CompressionLayer::new()
                .gzip(true)
                .deflate(true)
                .compress_when(SizeAbove::new(1024)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(get_cors_layer())
        .layer(axum_middleware::from_fn(security_headers_middleware))
}
