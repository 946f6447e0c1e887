use anyhow::Result;
use bcrypt::{hash, DEFAULT_COST};
use chrono::{DateTime, TimeZone, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tokyo_invoice_ws::api::invoices::service;
use tokyo_invoice_ws::db::{create_db_pool, DatabaseConfig};
use tokyo_invoice_ws::models::InvoiceItem;
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

    seed_users(&pool).await?;
    seed_invoices(&pool).await?;

    Ok(())
}

async fn seed_users(pool: &PgPool) -> Result<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        info!("Users already exist, skipping seeder");
        return Ok(());
    }

    let users = [
        ("admin", "admin123"),
        ("user1", "user123"),
        ("demo", "demo123"),
    ];

    for (username, password) in &users {
        let password_hash = hash(password, DEFAULT_COST)?;
        sqlx::query("INSERT INTO users (username, password_hash) VALUES ($1, $2)")
            .bind(username)
            .bind(&password_hash)
            .execute(pool)
            .await?;
    }

    info!("Created {} users", users.len());
    Ok(())
}

fn item(description: &str, quantity: f64, price: f64, is_taxable: bool) -> InvoiceItem {
    let mut item = InvoiceItem {
        description: description.to_string(),
        quantity,
        price,
        is_taxable,
        ..Default::default()
    };
    service::compute_item(&mut item);
    item
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

async fn seed_invoices(pool: &PgPool) -> Result<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        info!("Invoices already exist, skipping seeder");
        return Ok(());
    }

    let samples = [
        (
            "INV-00001-2024",
            "PT. ABC Company",
            date(2024, 1, 15),
            Some(date(2024, 2, 15)),
            vec![
                item("Web Development Service", 1.0, 5_000_000.0, true),
                item("Domain Registration", 1.0, 150_000.0, false),
            ],
            true,
        ),
        (
            "INV-00002-2024",
            "CV. XYZ Trading",
            date(2024, 1, 20),
            Some(date(2024, 2, 20)),
            vec![
                item("Mobile App Development", 1.0, 8_000_000.0, true),
                item("UI/UX Design", 1.0, 2_000_000.0, true),
            ],
            false,
        ),
        (
            "INV-00003-2024",
            "Toko Online Maju",
            date(2024, 2, 1),
            Some(date(2024, 3, 1)),
            vec![
                item("E-commerce Website", 1.0, 12_000_000.0, true),
                item("Payment Gateway Integration", 1.0, 3_000_000.0, true),
                item("SSL Certificate", 1.0, 500_000.0, false),
            ],
            false,
        ),
    ];

    for (invoice_no, customer_name, invoice_date, due_date, items, is_posted) in &samples {
        let grand_total = service::grand_total(items);
        sqlx::query(
            r#"
            INSERT INTO invoices (invoice_no, customer_name, date, due_date, items, grand_total, is_posted)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(invoice_no)
        .bind(customer_name)
        .bind(invoice_date)
        .bind(due_date)
        .bind(Json(items))
        .bind(grand_total)
        .bind(is_posted)
        .execute(pool)
        .await?;
    }

    info!("Created {} invoices", samples.len());
    Ok(())
}
