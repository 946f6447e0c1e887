use chrono::{Datelike, Utc};
use sqlx::PgPool;
use tracing::warn;

use crate::api::invoices::models::InvoiceItemInput;
use crate::api::invoices::repository;
use crate::models::{Invoice, InvoiceItem};

/// Flat PPN rate applied to taxable lines
pub const TAX_RATE_PERCENT: f64 = 11.0;

pub const INVOICE_NUMBER_PREFIX: &str = "INV-";
const INVOICE_NUMBER_PAD: usize = 5;

// ============================================================================
// TOTALS
// ============================================================================

/// Recompute the derived fields of a line from quantity/price/is_taxable.
/// Rounding is applied to the tax figure only, half away from zero, so
/// recomputing from the same inputs always yields the same result.
pub fn compute_item(item: &mut InvoiceItem) {
    let base = item.quantity * item.price;
    item.tax_amount = if item.is_taxable {
        (base * TAX_RATE_PERCENT / 100.0).round()
    } else {
        0.0
    };
    item.total = base + item.tax_amount;
}

pub fn grand_total(items: &[InvoiceItem]) -> f64 {
    items.iter().map(|item| item.total).sum()
}

/// Materialize incoming lines with their derived fields filled in
pub fn build_items(inputs: &[InvoiceItemInput]) -> Vec<InvoiceItem> {
    inputs
        .iter()
        .map(|input| {
            let mut item = InvoiceItem {
                description: input.description.trim().to_string(),
                quantity: input.quantity,
                price: input.price,
                is_taxable: input.is_taxable,
                ..Default::default()
            };
            compute_item(&mut item);
            item
        })
        .collect()
}

/// Presentation-time recompute: stored totals are never trusted, every read
/// rederives them from quantity/price/is_taxable.
pub fn recompute_invoice(invoice: &mut Invoice) {
    for item in &mut invoice.items {
        compute_item(item);
    }
    invoice.grand_total = grand_total(&invoice.items);
}

// ============================================================================
// INVOICE NUMBER GENERATION
// ============================================================================

/// Next sequential number for the year, in the form INV-NNNNN-YYYY.
/// Unparsable or non-positive middles are ignored.
pub fn next_invoice_number(existing: &[String], year: i32) -> String {
    let suffix = format!("-{}", year);

    let max = existing
        .iter()
        .filter_map(|no| {
            no.strip_prefix(INVOICE_NUMBER_PREFIX)
                .and_then(|rest| rest.strip_suffix(suffix.as_str()))
        })
        .filter_map(|middle| middle.parse::<i64>().ok())
        .filter(|n| *n > 0)
        .max();

    let next = max.map_or(1, |m| m + 1);
    format!(
        "{}{:0width$}{}",
        INVOICE_NUMBER_PREFIX,
        next,
        suffix,
        width = INVOICE_NUMBER_PAD
    )
}

/// Scan existing invoice numbers and produce the next one. There is no
/// locking here; under concurrent creation the unique index on invoice_no is
/// the only guard and the losing request gets a duplicate-key error.
pub async fn generate_invoice_number(pool: &PgPool) -> String {
    let now = Utc::now();
    let year = now.year();

    match repository::list_invoice_numbers(pool).await {
        Ok(numbers) => next_invoice_number(&numbers, year),
        Err(e) => {
            // Timestamp fallback stays unique even when the scan fails
            warn!("Invoice number scan failed, using timestamp fallback: {}", e);
            format!(
                "{}{}-{}",
                INVOICE_NUMBER_PREFIX,
                now.timestamp_millis(),
                year
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: f64, price: f64, is_taxable: bool) -> InvoiceItem {
        let mut item = InvoiceItem {
            description: "Test item".to_string(),
            quantity,
            price,
            is_taxable,
            ..Default::default()
        };
        compute_item(&mut item);
        item
    }

    #[test]
    fn test_taxable_item_gets_eleven_percent() {
        let item = item(1.0, 5_000_000.0, true);
        assert_eq!(item.tax_amount, 550_000.0);
        assert_eq!(item.total, 5_550_000.0);
    }

    #[test]
    fn test_non_taxable_item_has_zero_tax() {
        let item = item(1.0, 150_000.0, false);
        assert_eq!(item.tax_amount, 0.0);
        assert_eq!(item.total, 150_000.0);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 50 * 0.11 = 5.5 -> 6
        let item = item(1.0, 50.0, true);
        assert_eq!(item.tax_amount, 6.0);
        assert_eq!(item.total, 56.0);
    }

    #[test]
    fn test_quantity_scales_base_before_tax() {
        let item = item(3.0, 100.0, true);
        assert_eq!(item.tax_amount, 33.0);
        assert_eq!(item.total, 333.0);
    }

    #[test]
    fn test_grand_total_sums_line_totals() {
        let items = vec![item(1.0, 5_000_000.0, true), item(1.0, 150_000.0, false)];
        assert_eq!(grand_total(&items), 5_700_000.0);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut first = item(2.0, 12_345.0, true);
        let snapshot = first.clone();
        compute_item(&mut first);
        compute_item(&mut first);
        assert_eq!(first, snapshot);
    }

    #[test]
    fn test_recompute_overrides_stale_stored_totals() {
        let mut stale = item(1.0, 1_000.0, true);
        stale.total = 999_999.0;
        stale.tax_amount = 42.0;
        compute_item(&mut stale);
        assert_eq!(stale.tax_amount, 110.0);
        assert_eq!(stale.total, 1_110.0);
    }

    #[test]
    fn test_first_number_of_the_year() {
        assert_eq!(next_invoice_number(&[], 2024), "INV-00001-2024");
    }

    #[test]
    fn test_next_number_increments_the_maximum() {
        let existing = vec![
            "INV-00001-2024".to_string(),
            "INV-00007-2024".to_string(),
            "INV-00003-2024".to_string(),
        ];
        assert_eq!(next_invoice_number(&existing, 2024), "INV-00008-2024");
    }

    #[test]
    fn test_other_years_are_ignored() {
        let existing = vec![
            "INV-00042-2023".to_string(),
            "INV-00002-2024".to_string(),
        ];
        assert_eq!(next_invoice_number(&existing, 2024), "INV-00003-2024");
    }

    #[test]
    fn test_unparsable_and_non_positive_middles_are_skipped() {
        let existing = vec![
            "INV-abc-2024".to_string(),
            "INV-0-2024".to_string(),
            "INV--5-2024".to_string(),
            "FREE-FORM-NUMBER".to_string(),
        ];
        assert_eq!(next_invoice_number(&existing, 2024), "INV-00001-2024");
    }

    #[test]
    fn test_sequence_grows_past_the_padding() {
        let existing = vec!["INV-99999-2024".to_string()];
        assert_eq!(next_invoice_number(&existing, 2024), "INV-100000-2024");
    }

    #[test]
    fn test_timestamp_fallback_numbers_parse_as_positive() {
        // A fallback number generated in one scan must feed back into the
        // sequential generator without breaking it.
        let existing = vec!["INV-1717171717171-2024".to_string()];
        assert_eq!(
            next_invoice_number(&existing, 2024),
            "INV-1717171717172-2024"
        );
    }
}
