use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use chrono::{DateTime, NaiveDate, Utc};
use crate::api::dtos::{requests::LedgerFilter, responses::MessageResponse};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::{
    activity::action,
    invoice::InvoiceStatus,
    ledger::{validate_amount, CashInflow, CashOutflow, Currency, InflowDetails, LedgerRecord, OutflowDetails},
};
use crate::domain::ports::SCAN_LIMIT;
use crate::domain::services::{activity, role_policy::{authorize, Operation}};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::{info, warn};

/// Resolved form of a [`LedgerFilter`]. Day bounds cover the whole UTC day.
struct LedgerWindow {
    from: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    currency: Option<Currency>,
}

fn parse_day(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date '{}' (YYYY-MM-DD)", raw)))
}

impl LedgerWindow {
    fn from_filter(filter: &LedgerFilter) -> Result<Self, AppError> {
        let from = match filter.start_date.as_deref() {
            Some(raw) => parse_day(raw)?.and_hms_opt(0, 0, 0).map(|d| d.and_utc()),
            None => None,
        };
        let until = match filter.end_date.as_deref() {
            Some(raw) => parse_day(raw)?
                .succ_opt()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|d| d.and_utc()),
            None => None,
        };
        let currency = filter.currency.as_deref()
            .map(str::parse::<Currency>)
            .transpose()
            .map_err(AppError::Validation)?;
        Ok(Self { from, until, currency })
    }

    fn admits<R: LedgerRecord>(&self, record: &R) -> bool {
        if self.currency.is_some_and(|c| c != record.currency()) {
            return false;
        }
        if self.from.is_none() && self.until.is_none() {
            return true;
        }
        let Some(at) = record.recorded_at().resolve() else {
            return false;
        };
        self.from.is_none_or(|from| at >= from) && self.until.is_none_or(|until| at < until)
    }
}

pub async fn list_inflows(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(filter): Query<LedgerFilter>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::ManageLedger)?;
    let window = LedgerWindow::from_filter(&filter)?;

    let inflows: Vec<CashInflow> = state.ledger_repo.list_inflows(SCAN_LIMIT).await?
        .into_iter()
        .filter(|i| window.admits(i))
        .collect();
    Ok(Json(inflows))
}

pub async fn create_inflow(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<InflowDetails>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::ManageLedger)?;
    validate_amount(payload.amount).map_err(AppError::Validation)?;

    let inflow = CashInflow::new(payload, Some(user.user_id.clone()));
    let created = state.ledger_repo.create_inflow(&inflow).await?;

    if let Some(invoice_id) = created.invoice_id.as_deref() {
        match state.invoice_repo.update_status(invoice_id, InvoiceStatus::Paid).await {
            Ok(true) => info!("Invoice {} settled by inflow {}", invoice_id, created.inflow_id),
            Ok(false) => warn!("Inflow {} references unknown invoice {}", created.inflow_id, invoice_id),
            Err(e) => warn!("Failed to mark invoice {} paid: {}", invoice_id, e),
        }
    }

    let details = format!("{} {}", created.amount, created.currency);
    activity::record(state.activity_repo.as_ref(), &user, action::CREATED, "inflow", Some(&created.inflow_id), Some(details)).await;

    Ok(Json(created))
}

pub async fn update_inflow(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(inflow_id): Path<String>,
    Json(payload): Json<InflowDetails>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::ManageLedger)?;
    validate_amount(payload.amount).map_err(AppError::Validation)?;

    let mut inflow = state.ledger_repo.find_inflow(&inflow_id).await?
        .ok_or_else(|| AppError::NotFound("Inflow not found".into()))?;
    inflow.apply(payload);

    let updated = state.ledger_repo.update_inflow(&inflow).await?;
    activity::record(state.activity_repo.as_ref(), &user, action::UPDATED, "inflow", Some(&inflow_id), None).await;

    Ok(Json(updated))
}

pub async fn delete_inflow(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(inflow_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::ManageLedger)?;

    if !state.ledger_repo.delete_inflow(&inflow_id).await? {
        return Err(AppError::NotFound("Inflow not found".into()));
    }
    activity::record(state.activity_repo.as_ref(), &user, action::DELETED, "inflow", Some(&inflow_id), None).await;

    Ok(Json(MessageResponse::new("Inflow deleted")))
}

pub async fn list_outflows(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(filter): Query<LedgerFilter>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::ManageLedger)?;
    let window = LedgerWindow::from_filter(&filter)?;

    let outflows: Vec<CashOutflow> = state.ledger_repo.list_outflows(SCAN_LIMIT).await?
        .into_iter()
        .filter(|o| window.admits(o))
        .collect();
    Ok(Json(outflows))
}

pub async fn create_outflow(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<OutflowDetails>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::ManageLedger)?;
    validate_amount(payload.amount).map_err(AppError::Validation)?;

    let outflow = CashOutflow::new(payload, Some(user.user_id.clone()));
    let created = state.ledger_repo.create_outflow(&outflow).await?;

    let details = format!("{} {}", created.amount, created.currency);
    activity::record(state.activity_repo.as_ref(), &user, action::CREATED, "outflow", Some(&created.outflow_id), Some(details)).await;

    Ok(Json(created))
}

pub async fn update_outflow(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(outflow_id): Path<String>,
    Json(payload): Json<OutflowDetails>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::ManageLedger)?;
    validate_amount(payload.amount).map_err(AppError::Validation)?;

    let mut outflow = state.ledger_repo.find_outflow(&outflow_id).await?
        .ok_or_else(|| AppError::NotFound("Outflow not found".into()))?;
    outflow.apply(payload);

    let updated = state.ledger_repo.update_outflow(&outflow).await?;
    activity::record(state.activity_repo.as_ref(), &user, action::UPDATED, "outflow", Some(&outflow_id), None).await;

    Ok(Json(updated))
}

pub async fn delete_outflow(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(outflow_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::ManageLedger)?;

    if !state.ledger_repo.delete_outflow(&outflow_id).await? {
        return Err(AppError::NotFound("Outflow not found".into()));
    }
    activity::record(state.activity_repo.as_ref(), &user, action::DELETED, "outflow", Some(&outflow_id), None).await;

    Ok(Json(MessageResponse::new("Outflow deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ledger::PaymentMethod;
    use crate::domain::models::timestamp::StoredTimestamp;

    fn inflow_at(raw: &str, currency: Currency) -> CashInflow {
        let mut inflow = CashInflow::new(
            InflowDetails {
                category: "consultation".into(),
                description: "visit".into(),
                amount: 100.0,
                currency,
                payment_method: PaymentMethod::Cash,
                patient_id: None,
                invoice_id: None,
            },
            None,
        );
        inflow.recorded_at = StoredTimestamp::from_raw(raw);
        inflow
    }

    fn window(start: Option<&str>, end: Option<&str>, currency: Option<&str>) -> LedgerWindow {
        LedgerWindow::from_filter(&LedgerFilter {
            start_date: start.map(String::from),
            end_date: end.map(String::from),
            currency: currency.map(String::from),
        })
        .unwrap()
    }

    #[test]
    fn test_end_date_covers_the_whole_day() {
        let w = window(Some("2024-03-01"), Some("2024-03-31"), None);
        assert!(w.admits(&inflow_at("2024-03-01T00:00:00Z", Currency::Mkd)));
        assert!(w.admits(&inflow_at("2024-03-31T23:59:59Z", Currency::Mkd)));
        assert!(!w.admits(&inflow_at("2024-04-01T00:00:00Z", Currency::Mkd)));
        assert!(!w.admits(&inflow_at("2024-02-29T23:59:59Z", Currency::Mkd)));
    }

    #[test]
    fn test_currency_filter_and_unreadable_rows() {
        let w = window(None, None, Some("EUR"));
        assert!(w.admits(&inflow_at("garbage", Currency::Eur)));
        assert!(!w.admits(&inflow_at("2024-03-01T00:00:00Z", Currency::Mkd)));

        let dated = window(Some("2024-03-01"), None, None);
        assert!(!dated.admits(&inflow_at("garbage", Currency::Mkd)));
    }

    #[test]
    fn test_malformed_filter_is_rejected() {
        let bad_date = LedgerFilter { start_date: Some("03/01/2024".into()), ..Default::default() };
        assert!(matches!(LedgerWindow::from_filter(&bad_date), Err(AppError::Validation(_))));

        let bad_currency = LedgerFilter { currency: Some("USD".into()), ..Default::default() };
        assert!(matches!(LedgerWindow::from_filter(&bad_currency), Err(AppError::Validation(_))));
    }
}
