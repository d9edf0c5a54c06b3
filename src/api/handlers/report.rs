use axum::{extract::{Query, State}, response::IntoResponse, Json};
use chrono::{Datelike, Utc};
use crate::api::dtos::{requests::MonthlyReportQuery, responses::DashboardStats};
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::exchange_rate::current_rate;
use crate::domain::models::invoice::InvoiceStatus;
use crate::domain::ports::SCAN_LIMIT;
use crate::domain::services::{
    ledger_aggregator::{monthly_report, summarize},
    role_policy::{authorize, Operation},
};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::ViewDashboard)?;

    let inflows = state.ledger_repo.list_inflows(SCAN_LIMIT).await?;
    let outflows = state.ledger_repo.list_outflows(SCAN_LIMIT).await?;
    let rate = current_rate(&state).await?;

    Ok(Json(DashboardStats {
        ledger: summarize(&inflows, &outflows, rate, Utc::now()),
        patients_count: state.patient_repo.count().await?,
        invoices_pending: state.invoice_repo.count_by_status(InvoiceStatus::Pending).await?,
    }))
}

pub async fn monthly(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<MonthlyReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::ViewReports)?;

    let today = Utc::now();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    let inflows = state.ledger_repo.list_inflows(SCAN_LIMIT).await?;
    let outflows = state.ledger_repo.list_outflows(SCAN_LIMIT).await?;
    let rate = current_rate(&state).await?;

    Ok(Json(monthly_report(&inflows, &outflows, rate, year, month)?))
}
