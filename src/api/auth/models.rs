use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::User;

// ============================================================================
// REQUEST MODELS
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username must be between 3 and 50 characters long"
    ))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// ============================================================================
// RESPONSE MODELS
// ============================================================================

/// Public view of a user; the password hash stays behind
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthData {
    pub user: UserResponse,
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyData {
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_length_bounds() {
        let short = RegisterRequest {
            username: "ab".to_string(),
            password: "secret123".to_string(),
        };
        assert!(short.validate().is_err());

        let long = RegisterRequest {
            username: "a".repeat(51),
            password: "secret123".to_string(),
        };
        assert!(long.validate().is_err());

        let ok = RegisterRequest {
            username: "admin".to_string(),
            password: "secret123".to_string(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_register_request_weak_password() {
        let weak = RegisterRequest {
            username: "admin".to_string(),
            password: "12345".to_string(),
        };
        let err = weak.validate().unwrap_err();
        assert!(err.field_errors().contains_key("password"));
    }
}
