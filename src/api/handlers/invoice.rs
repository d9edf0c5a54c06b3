use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::api::dtos::{
    requests::PatientFilter,
    responses::{InvoicePrintResponse, MessageResponse},
};
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::exchange_rate::current_rate;
use crate::domain::models::{
    activity::action,
    invoice::{Invoice, InvoiceDetails, UNKNOWN_PATIENT},
    ledger::validate_amount,
};
use crate::domain::services::{activity, role_policy::{authorize, Operation}};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

async fn patient_name(state: &AppState, patient_id: &str) -> Result<String, AppError> {
    Ok(state.patient_repo
        .find_by_id(patient_id)
        .await?
        .map(|p| p.full_name())
        .unwrap_or_else(|| UNKNOWN_PATIENT.to_string()))
}

fn validate(details: &InvoiceDetails) -> Result<(), AppError> {
    for amount in [details.subtotal, details.tax_rate, details.tax_amount, details.total_amount] {
        validate_amount(amount).map_err(AppError::Validation)?;
    }
    Ok(())
}

pub async fn list_invoices(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(filter): Query<PatientFilter>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::ReadInvoice)?;
    Ok(Json(state.invoice_repo.list(filter.patient_id.as_deref()).await?))
}

pub async fn get_invoice(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(invoice_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::ReadInvoice)?;
    let invoice = state.invoice_repo.find_by_id(&invoice_id).await?
        .ok_or_else(|| AppError::NotFound("Invoice not found".into()))?;
    Ok(Json(invoice))
}

pub async fn create_invoice(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<InvoiceDetails>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::WriteInvoice)?;
    validate(&payload)?;

    let name = patient_name(&state, &payload.patient_id).await?;
    let invoice = Invoice::new(payload, name, Some(user.user_id.clone()));
    let created = state.invoice_repo.create(&invoice).await?;
    activity::record(state.activity_repo.as_ref(), &user, action::CREATED, "invoice", Some(&created.invoice_id), Some(created.invoice_number.clone())).await;

    info!("Created invoice {}", created.invoice_number);
    Ok(Json(created))
}

pub async fn update_invoice(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(invoice_id): Path<String>,
    Json(payload): Json<InvoiceDetails>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::WriteInvoice)?;
    validate(&payload)?;

    let mut invoice = state.invoice_repo.find_by_id(&invoice_id).await?
        .ok_or_else(|| AppError::NotFound("Invoice not found".into()))?;
    let name = patient_name(&state, &payload.patient_id).await?;
    invoice.apply(payload, name);

    let updated = state.invoice_repo.update(&invoice).await?;
    activity::record(state.activity_repo.as_ref(), &user, action::UPDATED, "invoice", Some(&invoice_id), None).await;

    Ok(Json(updated))
}

pub async fn delete_invoice(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(invoice_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::DeleteInvoice)?;

    if !state.invoice_repo.delete(&invoice_id).await? {
        return Err(AppError::NotFound("Invoice not found".into()));
    }
    activity::record(state.activity_repo.as_ref(), &user, action::DELETED, "invoice", Some(&invoice_id), None).await;

    Ok(Json(MessageResponse::new("Invoice deleted")))
}

pub async fn print_invoice(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(invoice_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::PrintInvoice)?;

    let invoice = state.invoice_repo.find_by_id(&invoice_id).await?
        .ok_or_else(|| AppError::NotFound("Invoice not found".into()))?;
    let patient = state.patient_repo.find_by_id(&invoice.patient_id).await?;
    let exchange_rate = current_rate(&state).await?;

    Ok(Json(InvoicePrintResponse {
        invoice,
        patient,
        exchange_rate,
        clinic: state.config.clinic.clone(),
    }))
}
