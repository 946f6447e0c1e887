use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::api::common::ApiResponse;
use crate::api::invoices::error_handling::InvoiceError;
use crate::api::invoices::models::{
    CreateInvoiceRequest, GeneratedNumber, SearchQuery, UpdateInvoiceRequest, UpdateStatusRequest,
};
use crate::api::invoices::repository::{self, InvoiceChanges, NewInvoice};
use crate::api::invoices::{service, validation};
use crate::models::Invoice;
use crate::state::AppState;

/// POST /api/invoices
pub async fn create_invoice(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Invoice>>), InvoiceError> {
    let (invoice_no, customer_name, date, item_inputs) = match (
        payload.invoice_no,
        payload.customer_name,
        payload.date,
        payload.items,
    ) {
        (Some(no), Some(name), Some(date), Some(items)) => (no, name, date, items),
        _ => return Err(InvoiceError::MissingFields),
    };

    validation::validate_invoice_data(&invoice_no, &customer_name, Some(date), &item_inputs)
        .map_err(InvoiceError::Validation)?;

    // Derived fields come from the service, never from the client
    let items = service::build_items(&item_inputs);
    let grand_total = service::grand_total(&items);

    let invoice = repository::create_invoice(
        &state.db_pool,
        &NewInvoice {
            invoice_no: invoice_no.trim(),
            customer_name: customer_name.trim(),
            date,
            due_date: payload.due_date,
            items: &items,
            grand_total,
            is_posted: payload.is_posted.unwrap_or(false),
        },
    )
    .await?;

    info!(invoice_no = %invoice.invoice_no, grand_total = invoice.grand_total, "✅ Invoice created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Invoice created successfully", invoice)),
    ))
}

/// GET /api/invoices/:id
pub async fn get_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Invoice>>, InvoiceError> {
    let id = parse_invoice_id(&id)?;

    let mut invoice = repository::find_by_id(&state.db_pool, id)
        .await?
        .ok_or(InvoiceError::NotFound)?;

    service::recompute_invoice(&mut invoice);

    Ok(Json(ApiResponse::ok(
        "Invoice retrieved successfully",
        invoice,
    )))
}

/// GET /api/invoices
pub async fn get_all_invoices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Invoice>>>, InvoiceError> {
    let mut invoices = repository::find_all(&state.db_pool).await?;
    invoices.iter_mut().for_each(service::recompute_invoice);

    Ok(Json(ApiResponse::ok(
        "Invoices retrieved successfully",
        invoices,
    )))
}

/// PUT /api/invoices/:id
pub async fn update_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateInvoiceRequest>,
) -> Result<Json<ApiResponse<Invoice>>, InvoiceError> {
    let id = parse_invoice_id(&id)?;

    // Replacing the item list means the whole invoice shape is revalidated
    // and the derived totals are rebuilt.
    let recomputed = match &payload.items {
        Some(item_inputs) => {
            validation::validate_invoice_data(
                payload.invoice_no.as_deref().unwrap_or(""),
                payload.customer_name.as_deref().unwrap_or(""),
                payload.date.or_else(|| Some(Utc::now())),
                item_inputs,
            )
            .map_err(InvoiceError::Validation)?;

            let items = service::build_items(item_inputs);
            let grand_total = service::grand_total(&items);
            Some((items, grand_total))
        }
        None => None,
    };

    let changes = InvoiceChanges {
        invoice_no: payload.invoice_no.as_deref().map(str::trim),
        customer_name: payload.customer_name.as_deref().map(str::trim),
        date: payload.date,
        due_date: payload.due_date,
        items: recomputed.as_ref().map(|(items, _)| items.as_slice()),
        grand_total: recomputed.as_ref().map(|(_, total)| *total),
        is_posted: payload.is_posted,
    };

    let invoice = repository::update_invoice(&state.db_pool, id, &changes)
        .await?
        .ok_or(InvoiceError::NotFound)?;

    info!(invoice_no = %invoice.invoice_no, "✅ Invoice updated");

    Ok(Json(ApiResponse::ok(
        "Invoice updated successfully",
        invoice,
    )))
}

/// DELETE /api/invoices/:id
pub async fn delete_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, InvoiceError> {
    let id = parse_invoice_id(&id)?;

    if !repository::delete_invoice(&state.db_pool, id).await? {
        return Err(InvoiceError::NotFound);
    }

    info!(invoice_id = %id, "🗑️ Invoice deleted");

    Ok(Json(ApiResponse::success_message(
        "Invoice deleted successfully",
    )))
}

/// GET /api/invoices/search?customerName=|startDate=&endDate=
pub async fn search_invoices(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<Invoice>>>, InvoiceError> {
    let mut invoices = if let Some(customer_name) = params.customer_name.as_deref() {
        repository::find_by_customer_name(&state.db_pool, customer_name).await?
    } else if let (Some(start), Some(end)) =
        (params.start_date.as_deref(), params.end_date.as_deref())
    {
        let start_date = parse_date_param(start)?;
        let end_date = parse_date_param(end)?;
        repository::find_by_date_range(&state.db_pool, start_date, end_date).await?
    } else {
        repository::find_all(&state.db_pool).await?
    };

    invoices.iter_mut().for_each(service::recompute_invoice);

    Ok(Json(ApiResponse::ok(
        "Invoices retrieved successfully",
        invoices,
    )))
}

/// GET /api/invoices/generate-number
pub async fn generate_invoice_number(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<GeneratedNumber>>, InvoiceError> {
    let invoice_no = service::generate_invoice_number(&state.db_pool).await;

    Ok(Json(ApiResponse::ok(
        "Invoice number generated successfully",
        GeneratedNumber { invoice_no },
    )))
}

/// PUT /api/invoices/:id/status
pub async fn update_invoice_posted_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<Invoice>>, InvoiceError> {
    let id = parse_invoice_id(&id)?;

    let is_posted = payload.is_posted.ok_or(InvoiceError::MissingPostedFlag)?;

    let invoice = repository::update_posted_status(&state.db_pool, id, is_posted)
        .await?
        .ok_or(InvoiceError::NotFound)?;

    info!(invoice_no = %invoice.invoice_no, is_posted, "✅ Invoice posted status updated");

    Ok(Json(ApiResponse::ok(
        "Invoice posted status updated successfully",
        invoice,
    )))
}

/// GET /api/invoices/status/:isPosted
pub async fn get_invoices_by_posted_status(
    State(state): State<Arc<AppState>>,
    Path(is_posted): Path<String>,
) -> Result<Json<ApiResponse<Vec<Invoice>>>, InvoiceError> {
    let is_posted = match is_posted.as_str() {
        "true" => true,
        "false" => false,
        _ => return Err(InvoiceError::InvalidPostedParam),
    };

    let mut invoices = repository::find_by_posted_status(&state.db_pool, is_posted).await?;
    invoices.iter_mut().for_each(service::recompute_invoice);

    Ok(Json(ApiResponse::ok(
        "Invoices retrieved successfully",
        invoices,
    )))
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

// A malformed id cannot name any invoice, so it reads as a missing resource
fn parse_invoice_id(raw: &str) -> Result<Uuid, InvoiceError> {
    raw.parse::<Uuid>().map_err(|_| InvoiceError::NotFound)
}

// Accepts RFC 3339 timestamps or bare YYYY-MM-DD dates (midnight UTC)
fn parse_date_param(raw: &str) -> Result<DateTime<Utc>, InvoiceError> {
    if let Ok(dt) = raw.parse::<DateTime<Utc>>() {
        return Ok(dt);
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(DateTime::from_naive_utc_and_offset(
            date.and_time(NaiveTime::MIN),
            Utc,
        ));
    }

    Err(InvoiceError::InvalidDateParam(raw.to_string()))
}
