use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single invoice line. `tax_amount` and `total` are derived columns and
/// are always recomputed from quantity/price/is_taxable before they are
/// stored or served.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: f64,
    pub price: f64,
    #[serde(default)]
    pub total: f64,
    pub is_taxable: bool,
    #[serde(default)]
    pub tax_amount: f64,
}

/// Invoice row. Line items are embedded as a JSONB document, mirroring the
/// single-collection layout the API exposes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_no: String,
    pub customer_name: String,
    pub date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    #[sqlx(json)]
    pub items: Vec<InvoiceItem>,
    pub grand_total: f64,
    pub is_posted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
