use sqlx::PgPool;
use tracing::error;

use crate::api::auth::error_handling::AuthError;
use crate::models::User;

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, AuthError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash, created_at, updated_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        error!("Error finding user by username: {}", e);
        AuthError::Database(e)
    })?;

    Ok(user)
}

pub async fn create_user(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
) -> Result<User, AuthError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password_hash)
        VALUES ($1, $2)
        RETURNING id, username, password_hash, created_at, updated_at
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        // Two concurrent registrations can both pass the lookup; the unique
        // index on username decides the winner.
        if e.as_database_error()
            .map(|db| db.is_unique_violation())
            .unwrap_or(false)
        {
            AuthError::UsernameTaken
        } else {
            error!("Error creating user: {}", e);
            AuthError::Database(e)
        }
    })?;

    Ok(user)
}

#[cfg(test)]
mod tests {
    // Repository behavior is covered by the ignored integration tests in
    // tests/invoice_flow_test.rs; they require a database.
}
