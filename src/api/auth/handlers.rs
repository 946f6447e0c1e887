use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Json,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::api::auth::error_handling::AuthError;
use crate::api::auth::models::{AuthData, LoginRequest, RegisterRequest, UserResponse, VerifyData};
use crate::api::auth::repository;
use crate::api::common::ApiResponse;
use crate::middleware::verify_jwt_token;
use crate::state::AppState;
use crate::utils::create_jwt_token;

/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthData>>), AuthError> {
    let username = payload.username.trim().to_string();

    if username.is_empty() || payload.password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    if let Err(validation_errors) = payload.validate() {
        warn!(username = %username, "❌ Registration validation failed");
        return Err(AuthError::Validation(collect_messages(&validation_errors)));
    }

    if repository::find_by_username(&state.db_pool, &username)
        .await?
        .is_some()
    {
        warn!(username = %username, "❌ Username already exists");
        return Err(AuthError::UsernameTaken);
    }

    let password_hash =
        hash(&payload.password, DEFAULT_COST).map_err(|e| AuthError::PasswordHash(e.to_string()))?;

    let user = repository::create_user(&state.db_pool, &username, &password_hash).await?;

    let token = create_jwt_token(user.id).map_err(AuthError::TokenCreation)?;

    info!(username = %user.username, user_id = %user.id, "✅ User registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "User registered successfully",
            AuthData {
                user: UserResponse::from(&user),
                token,
            },
        )),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthData>>, AuthError> {
    let username = payload.username.trim();

    if username.is_empty() || payload.password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    // Unknown user and wrong password answer identically, so the response
    // never reveals which field was wrong.
    let user = repository::find_by_username(&state.db_pool, username)
        .await?
        .ok_or_else(|| {
            info!(username = %username, "Login attempt for non-existent user");
            AuthError::InvalidCredentials
        })?;

    if !verify(&payload.password, &user.password_hash).unwrap_or(false) {
        info!(username = %username, "Invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    let token = create_jwt_token(user.id).map_err(AuthError::TokenCreation)?;

    info!(username = %user.username, user_id = %user.id, "✅ Successful login");

    Ok(Json(ApiResponse::ok(
        "Login successful",
        AuthData {
            user: UserResponse::from(&user),
            token,
        },
    )))
}

/// GET /api/auth/verify
pub async fn verify_token(headers: HeaderMap) -> Result<Json<ApiResponse<VerifyData>>, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let claims = verify_jwt_token(token).map_err(|e| {
        warn!("Token verification failed: {}", e);
        AuthError::InvalidToken
    })?;

    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::InvalidToken)?;

    Ok(Json(ApiResponse::ok(
        "Token is valid",
        VerifyData { user_id },
    )))
}

// Flattens validator output into the envelope's error list, fields in a
// stable order.
fn collect_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    let field_errors = errors.field_errors();
    ["username", "password"]
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .flat_map(|errs| errs.iter())
        .map(|err| {
            err.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Invalid value".to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_messages_orders_username_first() {
        let request = RegisterRequest {
            username: "ab".to_string(),
            password: "123".to_string(),
        };
        let errors = request.validate().unwrap_err();
        let messages = collect_messages(&errors);

        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[0],
            "Username must be between 3 and 50 characters long"
        );
        assert_eq!(messages[1], "Password must be at least 6 characters long");
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hashed = hash("admin123", 4).unwrap(); // low cost to keep the test fast
        assert!(verify("admin123", &hashed).unwrap());
        assert!(!verify("wrong-password", &hashed).unwrap());
    }
}
