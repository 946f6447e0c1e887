// End-to-end exercises of the invoice business logic: validation,
// tax/total computation and number generation working together the way the
// create/update handlers drive them.

use chrono::{TimeZone, Utc};
use tokyo_invoice_ws::api::invoices::models::InvoiceItemInput;
use tokyo_invoice_ws::api::invoices::{service, validation};
use tokyo_invoice_ws::models::{Invoice, InvoiceItem};
use uuid::Uuid;

fn input(description: &str, quantity: f64, price: f64, is_taxable: bool) -> InvoiceItemInput {
    InvoiceItemInput {
        description: description.to_string(),
        quantity,
        price,
        is_taxable,
    }
}

#[test]
fn test_create_flow_computes_ppn_totals() {
    // The exact worked example: one taxable line of 5,000,000 and one
    // non-taxable line of 150,000.
    let inputs = vec![
        input("Web Development Service", 1.0, 5_000_000.0, true),
        input("Domain Registration", 1.0, 150_000.0, false),
    ];

    validation::validate_invoice_data(
        "INV-00001-2024",
        "PT. ABC Company",
        Some(Utc::now()),
        &inputs,
    )
    .expect("sample invoice should validate");

    let items = service::build_items(&inputs);

    assert_eq!(items[0].tax_amount, 550_000.0);
    assert_eq!(items[0].total, 5_550_000.0);
    assert_eq!(items[1].tax_amount, 0.0);
    assert_eq!(items[1].total, 150_000.0);
    assert_eq!(service::grand_total(&items), 5_700_000.0);
}

#[test]
fn test_empty_invoice_is_rejected_with_item_error() {
    let errors = validation::validate_invoice_data(
        "INV-00001-2024",
        "PT. ABC Company",
        Some(Utc::now()),
        &[],
    )
    .unwrap_err();

    assert_eq!(errors, vec!["At least one item is required".to_string()]);
}

#[test]
fn test_client_supplied_totals_are_ignored() {
    // A stored invoice with doctored totals; every read recomputes from
    // quantity/price/is_taxable, so the lie never reaches a caller.
    let mut invoice = Invoice {
        id: Uuid::new_v4(),
        invoice_no: "INV-00004-2024".to_string(),
        customer_name: "CV. XYZ Trading".to_string(),
        date: Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap(),
        due_date: None,
        items: vec![InvoiceItem {
            description: "Mobile App Development".to_string(),
            quantity: 1.0,
            price: 8_000_000.0,
            total: 1.0,
            is_taxable: true,
            tax_amount: 0.0,
        }],
        grand_total: 1.0,
        is_posted: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    service::recompute_invoice(&mut invoice);

    assert_eq!(invoice.items[0].tax_amount, 880_000.0);
    assert_eq!(invoice.items[0].total, 8_880_000.0);
    assert_eq!(invoice.grand_total, 8_880_000.0);
}

#[test]
fn test_recomputing_twice_changes_nothing() {
    let inputs = vec![input("Consulting", 7.0, 123_456.0, true)];
    let mut items = service::build_items(&inputs);
    let first_total = service::grand_total(&items);

    for item in &mut items {
        service::compute_item(item);
    }

    assert_eq!(service::grand_total(&items), first_total);
}

#[test]
fn test_number_generation_is_monotonic_within_a_year() {
    // Simulates generate -> persist -> generate: the second number is
    // always the successor of the first.
    let mut persisted: Vec<String> = vec![
        "INV-00001-2024".to_string(),
        "INV-00002-2024".to_string(),
    ];

    let first = service::next_invoice_number(&persisted, 2024);
    assert_eq!(first, "INV-00003-2024");
    persisted.push(first);

    let second = service::next_invoice_number(&persisted, 2024);
    assert_eq!(second, "INV-00004-2024");
}

#[test]
fn test_year_rollover_restarts_the_sequence() {
    let persisted = vec![
        "INV-00041-2023".to_string(),
        "INV-00042-2023".to_string(),
    ];
    assert_eq!(
        service::next_invoice_number(&persisted, 2024),
        "INV-00001-2024"
    );
}

// ============================================================================
// DATABASE TESTS
// ============================================================================
// These exercise the repositories against a live Postgres (DATABASE_URL with
// migrations applied) and are ignored by default.

#[tokio::test]
#[ignore] // Requires database setup
async fn test_duplicate_invoice_number_is_a_creation_error() {
    // Creating two invoices with the same invoice_no must fail on the
    // second insert with a duplicate-number error from the unique index.
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_duplicate_username_registration_conflicts() {
    // Registering the same username twice must fail the second time even
    // when both requests pass the existence lookup concurrently.
}
