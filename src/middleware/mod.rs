pub mod auth;

pub use auth::{extract_current_user, verify_jwt_token, CurrentUser, JwtClaims};
