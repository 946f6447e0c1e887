use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::api::invoices::error_handling::InvoiceError;
use crate::models::{Invoice, InvoiceItem};

const INVOICE_COLUMNS: &str = "id, invoice_no, customer_name, date, due_date, items, \
                               grand_total, is_posted, created_at, updated_at";

// ============================================================================
// WRITE MODELS
// ============================================================================

pub struct NewInvoice<'a> {
    pub invoice_no: &'a str,
    pub customer_name: &'a str,
    pub date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub items: &'a [InvoiceItem],
    pub grand_total: f64,
    pub is_posted: bool,
}

/// Partial update; None leaves the column untouched
#[derive(Default)]
pub struct InvoiceChanges<'a> {
    pub invoice_no: Option<&'a str>,
    pub customer_name: Option<&'a str>,
    pub date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub items: Option<&'a [InvoiceItem]>,
    pub grand_total: Option<f64>,
    pub is_posted: Option<bool>,
}

fn map_write_error(e: sqlx::Error, invoice_no: &str) -> InvoiceError {
    // Racing generate-number callers hit the unique index here; the loser
    // gets a creation error and retries.
    if e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
    {
        InvoiceError::DuplicateNumber(invoice_no.to_string())
    } else {
        error!("Error writing invoice: {}", e);
        InvoiceError::Database(e)
    }
}

// ============================================================================
// CRUD
// ============================================================================

pub async fn create_invoice(
    pool: &PgPool,
    new_invoice: &NewInvoice<'_>,
) -> Result<Invoice, InvoiceError> {
    let query = format!(
        r#"
        INSERT INTO invoices (invoice_no, customer_name, date, due_date, items, grand_total, is_posted)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {INVOICE_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Invoice>(&query)
        .bind(new_invoice.invoice_no)
        .bind(new_invoice.customer_name)
        .bind(new_invoice.date)
        .bind(new_invoice.due_date)
        .bind(Json(new_invoice.items))
        .bind(new_invoice.grand_total)
        .bind(new_invoice.is_posted)
        .fetch_one(pool)
        .await
        .map_err(|e| map_write_error(e, new_invoice.invoice_no))
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    let query = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1");

    sqlx::query_as::<_, Invoice>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            error!("Error finding invoice by id: {}", e);
            InvoiceError::Database(e)
        })
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<Invoice>, InvoiceError> {
    let query = format!("SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY created_at DESC");

    sqlx::query_as::<_, Invoice>(&query)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            error!("Error finding all invoices: {}", e);
            InvoiceError::Database(e)
        })
}

pub async fn update_invoice(
    pool: &PgPool,
    id: Uuid,
    changes: &InvoiceChanges<'_>,
) -> Result<Option<Invoice>, InvoiceError> {
    let query = format!(
        r#"
        UPDATE invoices SET
            invoice_no    = COALESCE($2, invoice_no),
            customer_name = COALESCE($3, customer_name),
            date          = COALESCE($4, date),
            due_date      = COALESCE($5, due_date),
            items         = COALESCE($6, items),
            grand_total   = COALESCE($7, grand_total),
            is_posted     = COALESCE($8, is_posted),
            updated_at    = now()
        WHERE id = $1
        RETURNING {INVOICE_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Invoice>(&query)
        .bind(id)
        .bind(changes.invoice_no)
        .bind(changes.customer_name)
        .bind(changes.date)
        .bind(changes.due_date)
        .bind(changes.items.map(Json))
        .bind(changes.grand_total)
        .bind(changes.is_posted)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_write_error(e, changes.invoice_no.unwrap_or("")))
}

pub async fn delete_invoice(pool: &PgPool, id: Uuid) -> Result<bool, InvoiceError> {
    let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            error!("Error deleting invoice: {}", e);
            InvoiceError::Database(e)
        })?;

    Ok(result.rows_affected() > 0)
}

// ============================================================================
// SEARCH
// ============================================================================

pub async fn find_by_customer_name(
    pool: &PgPool,
    customer_name: &str,
) -> Result<Vec<Invoice>, InvoiceError> {
    let query = format!(
        r#"
        SELECT {INVOICE_COLUMNS} FROM invoices
        WHERE customer_name ILIKE '%' || $1 || '%'
        ORDER BY created_at DESC
        "#
    );

    sqlx::query_as::<_, Invoice>(&query)
        .bind(customer_name)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            error!("Error finding invoices by customer name: {}", e);
            InvoiceError::Database(e)
        })
}

pub async fn find_by_date_range(
    pool: &PgPool,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
) -> Result<Vec<Invoice>, InvoiceError> {
    let query = format!(
        r#"
        SELECT {INVOICE_COLUMNS} FROM invoices
        WHERE date >= $1 AND date <= $2
        ORDER BY date DESC
        "#
    );

    sqlx::query_as::<_, Invoice>(&query)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            error!("Error finding invoices by date range: {}", e);
            InvoiceError::Database(e)
        })
}

pub async fn find_by_posted_status(
    pool: &PgPool,
    is_posted: bool,
) -> Result<Vec<Invoice>, InvoiceError> {
    let query = format!(
        r#"
        SELECT {INVOICE_COLUMNS} FROM invoices
        WHERE is_posted = $1
        ORDER BY created_at DESC
        "#
    );

    sqlx::query_as::<_, Invoice>(&query)
        .bind(is_posted)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            error!("Error finding invoices by posted status: {}", e);
            InvoiceError::Database(e)
        })
}

// ============================================================================
// STATUS & NUMBER HELPERS
// ============================================================================

pub async fn update_posted_status(
    pool: &PgPool,
    id: Uuid,
    is_posted: bool,
) -> Result<Option<Invoice>, InvoiceError> {
    let query = format!(
        r#"
        UPDATE invoices SET is_posted = $2, updated_at = now()
        WHERE id = $1
        RETURNING {INVOICE_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Invoice>(&query)
        .bind(id)
        .bind(is_posted)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            error!("Error updating invoice posted status: {}", e);
            InvoiceError::Database(e)
        })
}

pub async fn list_invoice_numbers(pool: &PgPool) -> Result<Vec<String>, InvoiceError> {
    sqlx::query_scalar::<_, String>("SELECT invoice_no FROM invoices")
        .fetch_all(pool)
        .await
        .map_err(|e| {
            error!("Error listing invoice numbers: {}", e);
            InvoiceError::Database(e)
        })
}

#[cfg(test)]
mod tests {
    // The queries above are exercised by the ignored database tests in
    // tests/invoice_flow_test.rs.
}
