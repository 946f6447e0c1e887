use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::api::common::ApiResponse;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Username and password are required")]
    MissingCredentials,

    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No token provided")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AuthError::MissingCredentials => (
                StatusCode::BAD_REQUEST,
                ApiResponse::fail("Username and password are required"),
            ),
            AuthError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::fail_with_errors("Validation failed", errors),
            ),
            AuthError::UsernameTaken => (
                StatusCode::CONFLICT,
                ApiResponse::fail("Username already exists"),
            ),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ApiResponse::fail("Invalid credentials"),
            ),
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                ApiResponse::fail("No token provided"),
            ),
            AuthError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, ApiResponse::fail("Invalid token"))
            }
            AuthError::PasswordHash(e) => {
                error!("Password hashing failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::fail("Internal server error"),
                )
            }
            AuthError::TokenCreation(e) => {
                error!("Token creation failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::fail("Internal server error"),
                )
            }
            AuthError::Database(e) => {
                error!("Database error in auth endpoint: {}", e);
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
    fn test_invalid_credentials_is_unauthorized() {
        let response = AuthError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_username_taken_is_conflict() {
        let response = AuthError::UsernameTaken.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_validation_is_bad_request() {
        let response =
            AuthError::Validation(vec!["Password must be at least 6 characters long".into()])
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
