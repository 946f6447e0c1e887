pub mod auth;
pub mod common;
pub mod invoices;

use axum::middleware::from_fn;
use axum::Router;
use std::sync::Arc;

use crate::middleware::extract_current_user;
use crate::state::AppState;

// Public routes (no JWT): register, login, verify
fn create_public_router() -> Router<Arc<AppState>> {
    Router::new().nest("/api/auth", auth::create_auth_router())
}

// Protected routes (JWT applied to everything under /api/invoices)
fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new().nest(
        "/api/invoices",
        invoices::create_invoices_router().layer(from_fn(extract_current_user)),
    )
}

/// Creates the API router with all REST endpoints
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(create_public_router())
        .merge(create_protected_router())
}
