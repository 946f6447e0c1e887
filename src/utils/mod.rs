use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use std::env;
use uuid::Uuid;

use crate::middleware::auth::JwtClaims;

const JWT_EXPIRATION_HOURS: i64 = 24;

// Utility function to create a signed JWT for the given user
pub fn create_jwt_token(user_id: Uuid) -> Result<String, String> {
    let jwt_secret =
        env::var("JWT_SECRET").unwrap_or_else(|_| "tokyo-invoice-dev-secret-change-me".to_string());

    let now = Utc::now();
    let expiration = now + chrono::Duration::hours(JWT_EXPIRATION_HOURS);

    let claims = JwtClaims {
        sub: user_id.to_string(),
        exp: expiration.timestamp(),
        iat: now.timestamp(),
        jti: Some(Uuid::new_v4().to_string()),
    };

    let encoding_key = EncodingKey::from_secret(jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| format!("Failed to create JWT token: {}", e))
}
