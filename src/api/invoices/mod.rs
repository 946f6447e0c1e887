// Invoice API module: CRUD, search, posted-status handling and
// invoice-number generation

pub mod error_handling;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod validation;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::state::AppState;

pub fn create_invoices_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::create_invoice))
        .route("/", get(handlers::get_all_invoices))
        .route("/search", get(handlers::search_invoices))
        .route("/generate-number", get(handlers::generate_invoice_number))
        .route("/status/:is_posted", get(handlers::get_invoices_by_posted_status))
        .route("/:id", get(handlers::get_invoice))
        .route("/:id", put(handlers::update_invoice))
        .route("/:id", delete(handlers::delete_invoice))
        .route("/:id/status", put(handlers::update_invoice_posted_status))
}
