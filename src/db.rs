use sqlx::{postgres::PgPoolOptions, PgPool};
use std::env;
use std::time::Duration;
use tracing::info;

/// Database connection pool configuration
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 20,
            min_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600), // 10 minutes
            max_lifetime: Duration::from_secs(1800), // 30 minutes
        }
    }
}

impl DatabaseConfig {
    /// Defaults overridable through DATABASE_* environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_connections: env_u64("DATABASE_MAX_CONNECTIONS", defaults.max_connections as u64)
                as u32,
            min_connections: env_u64("DATABASE_MIN_CONNECTIONS", defaults.min_connections as u64)
                as u32,
            acquire_timeout: Duration::from_secs(env_u64(
                "DATABASE_ACQUIRE_TIMEOUT_SECONDS",
                defaults.acquire_timeout.as_secs(),
            )),
            idle_timeout: Duration::from_secs(env_u64(
                "DATABASE_IDLE_TIMEOUT_SECONDS",
                defaults.idle_timeout.as_secs(),
            )),
            max_lifetime: Duration::from_secs(env_u64(
                "DATABASE_MAX_LIFETIME_SECONDS",
                defaults.max_lifetime.as_secs(),
            )),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Create the application database pool
pub async fn create_db_pool(
    database_url: &str,
    config: DatabaseConfig,
) -> Result<PgPool, sqlx::Error> {
    info!(
        "🔧 Creating database pool with {} max connections",
        config.max_connections
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .test_before_acquire(true)
        .connect(database_url)
        .await?;

    info!("✅ Database pool created successfully");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 5);
        assert_eq!(config.acquire_timeout, Duration::from_secs(30));
    }
}
