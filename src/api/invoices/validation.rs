use chrono::{DateTime, Utc};

use crate::api::invoices::models::InvoiceItemInput;

// ============================================================================
// VALIDATION FUNCTIONS
// ============================================================================

/// Validate invoice data for create/update. Violations are collected into a
/// single list so the caller sees everything at once instead of the first
/// failure.
pub fn validate_invoice_data(
    invoice_no: &str,
    customer_name: &str,
    date: Option<DateTime<Utc>>,
    items: &[InvoiceItemInput],
) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if invoice_no.trim().is_empty() {
        errors.push("Invoice number is required".to_string());
    }

    if customer_name.trim().is_empty() {
        errors.push("Customer name is required".to_string());
    }

    if date.is_none() {
        errors.push("Date is required".to_string());
    }

    if items.is_empty() {
        errors.push("At least one item is required".to_string());
    } else {
        for (index, item) in items.iter().enumerate() {
            if item.description.trim().is_empty() {
                errors.push(format!("Item {}: Description is required", index + 1));
            }
            if item.quantity <= 0.0 {
                errors.push(format!("Item {}: Quantity must be greater than 0", index + 1));
            }
            if item.price < 0.0 {
                errors.push(format!("Item {}: Price must be 0 or greater", index + 1));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(description: &str, quantity: f64, price: f64) -> InvoiceItemInput {
        InvoiceItemInput {
            description: description.to_string(),
            quantity,
            price,
            is_taxable: true,
        }
    }

    fn now() -> Option<DateTime<Utc>> {
        Some(Utc::now())
    }

    #[test]
    fn test_valid_invoice_passes() {
        let items = vec![item("Web Development Service", 1.0, 5_000_000.0)];
        assert!(validate_invoice_data("INV-00001-2024", "PT. ABC Company", now(), &items).is_ok());
    }

    #[test]
    fn test_empty_item_list_is_rejected() {
        let errors =
            validate_invoice_data("INV-00001-2024", "PT. ABC Company", now(), &[]).unwrap_err();
        assert_eq!(errors, vec!["At least one item is required".to_string()]);
    }

    #[test]
    fn test_missing_header_fields_are_all_reported() {
        let items = vec![item("Consulting", 1.0, 100.0)];
        let errors = validate_invoice_data("", "  ", None, &items).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Invoice number is required".to_string(),
                "Customer name is required".to_string(),
                "Date is required".to_string(),
            ]
        );
    }

    #[test]
    fn test_item_violations_carry_their_position() {
        let items = vec![
            item("Valid line", 1.0, 100.0),
            item("", 0.0, -1.0),
        ];
        let errors =
            validate_invoice_data("INV-00001-2024", "CV. XYZ Trading", now(), &items).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Item 2: Description is required".to_string(),
                "Item 2: Quantity must be greater than 0".to_string(),
                "Item 2: Price must be 0 or greater".to_string(),
            ]
        );
    }

    #[test]
    fn test_zero_price_is_allowed() {
        let items = vec![item("Free warranty extension", 1.0, 0.0)];
        assert!(validate_invoice_data("INV-00002-2024", "PT. ABC Company", now(), &items).is_ok());
    }

    #[test]
    fn test_negative_quantity_is_rejected() {
        let items = vec![item("Consulting", -2.0, 100.0)];
        let errors =
            validate_invoice_data("INV-00003-2024", "PT. ABC Company", now(), &items).unwrap_err();
        assert_eq!(
            errors,
            vec!["Item 1: Quantity must be greater than 0".to_string()]
        );
    }
}
