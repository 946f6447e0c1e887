use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::api::common::ApiResponse;

// ============================================================================
// ERROR TYPES
// ============================================================================

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("Invoice number, customer name, date, and items are required")]
    MissingFields,

    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("Invoice not found")]
    NotFound,

    #[error("Invoice number already exists: {0}")]
    DuplicateNumber(String),

    #[error("isPosted must be a boolean value")]
    MissingPostedFlag,

    #[error("isPosted must be 'true' or 'false'")]
    InvalidPostedParam,

    #[error("Invalid date: {0}")]
    InvalidDateParam(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// ============================================================================
// HTTP RESPONSE CONVERSION
// ============================================================================

impl IntoResponse for InvoiceError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            InvoiceError::MissingFields => (
                StatusCode::BAD_REQUEST,
                ApiResponse::fail("Invoice number, customer name, date, and items are required"),
            ),
            InvoiceError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::fail_with_errors("Validation failed", errors),
            ),
            InvoiceError::NotFound => {
                (StatusCode::NOT_FOUND, ApiResponse::fail("Invoice not found"))
            }
            InvoiceError::DuplicateNumber(invoice_no) => (
                StatusCode::CONFLICT,
                ApiResponse::fail(format!(
                    "Invoice number already exists: {}",
                    invoice_no
                )),
            ),
            InvoiceError::MissingPostedFlag => (
                StatusCode::BAD_REQUEST,
                ApiResponse::fail("isPosted must be a boolean value"),
            ),
            InvoiceError::InvalidPostedParam => (
                StatusCode::BAD_REQUEST,
                ApiResponse::fail("isPosted must be 'true' or 'false'"),
            ),
            InvoiceError::InvalidDateParam(raw) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::fail(format!("Invalid date: {}", raw)),
            ),
            InvoiceError::Database(e) => {
                error!("Database error in invoice endpoint: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::fail("Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_response() {
        let error =
            InvoiceError::Validation(vec!["At least one item is required".to_string()]);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_response() {
        let response = InvoiceError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_duplicate_number_response() {
        let error = InvoiceError::DuplicateNumber("INV-00001-2024".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
