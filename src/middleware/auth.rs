use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;
use uuid::Uuid;

use crate::api::common::ApiResponse;

/// JWT claims structure matching the token payload
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    pub sub: String, // user id as string
    pub exp: i64,
    pub iat: i64,
    pub jti: Option<String>,
}

/// Current user data extracted from a validated JWT
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub token: String,
}

pub const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

pub(crate) fn get_jwt_secret() -> String {
    env::var("JWT_SECRET").unwrap_or_else(|_| "tokyo-invoice-dev-secret-change-me".to_string())
}

fn unauthorized(message: &str) -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::fail(message)),
    )
}

/// Extract and validate the bearer token from the Authorization header.
/// On success the authenticated user is inserted into request extensions.
pub async fn extract_current_user(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<()>>)> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header");
            unauthorized("Access denied. No token provided.")
        })?;

    if !auth_header.starts_with("Bearer ") {
        warn!("Invalid Authorization header format");
        return Err(unauthorized("Access denied. No token provided."));
    }

    let token = auth_header.trim_start_matches("Bearer ").trim();
    if token.is_empty() {
        warn!("Empty JWT token");
        return Err(unauthorized("Access denied. No token provided."));
    }

    // Any decode failure (bad signature, expiry, malformed subject) is
    // reported uniformly, never field by field.
    let claims = verify_jwt_token(token).map_err(|e| {
        warn!("JWT validation failed: {}", e);
        unauthorized("Access denied. Invalid or expired token.")
    })?;

    let user_id = claims.sub.parse::<Uuid>().map_err(|_| {
        warn!("Invalid user id in JWT sub field: {}", claims.sub);
        unauthorized("Access denied. Invalid or expired token.")
    })?;

    let current_user = CurrentUser {
        user_id,
        token: token.to_string(),
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Validate a JWT and return its claims
pub fn verify_jwt_token(token: &str) -> Result<JwtClaims, String> {
    let jwt_secret = get_jwt_secret();
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let validation = Validation::new(JWT_ALGORITHM);

    decode::<JwtClaims>(token, &decoding_key, &validation)
        .map(|token_data| token_data.claims)
        .map_err(|e| format!("JWT validation failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::create_jwt_token;

    #[test]
    fn test_jwt_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = create_jwt_token(user_id).unwrap();
        let claims = verify_jwt_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.exp > claims.iat);
        assert!(claims.jti.is_some());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_jwt_token("not-a-jwt").is_err());
    }

    #[test]
    fn test_wrong_signature_rejected() {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let claims = JwtClaims {
            sub: Uuid::new_v4().to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
            iat: chrono::Utc::now().timestamp(),
            jti: None,
        };
        let token = encode(
            &Header::new(JWT_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(b"some-other-secret"),
        )
        .unwrap();

        assert!(verify_jwt_token(&token).is_err());
    }
}
