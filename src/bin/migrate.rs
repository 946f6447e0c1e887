use anyhow::Result;
use tokyo_invoice_ws::db::{create_db_pool, DatabaseConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|e| anyhow::anyhow!("DATABASE_URL must be set: {}", e))?;
    let pool = create_db_pool(&database_url, DatabaseConfig::from_env()).await?;

    info!("🗃️ Running database migrations");
    sqlx::migrate!().run(&pool).await?;
    info!("✅ Migrations applied successfully");

    Ok(())
}
