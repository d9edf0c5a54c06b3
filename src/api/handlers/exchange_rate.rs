use axum::{extract::State, response::IntoResponse, Json};
use crate::api::dtos::requests::UpdateExchangeRateRequest;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::{activity::action, exchange_rate::{ExchangeRate, DEFAULT_EUR_TO_MKD}};
use crate::domain::services::{activity, role_policy::{authorize, Operation}};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

/// The rate reports convert with; the default when none has been stored.
pub async fn current_rate(state: &AppState) -> Result<f64, AppError> {
    Ok(state.exchange_rate_repo
        .current()
        .await?
        .map(|r| r.eur_to_mkd)
        .unwrap_or(DEFAULT_EUR_TO_MKD))
}

pub async fn get_exchange_rate(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::ReadExchangeRate)?;

    if let Some(rate) = state.exchange_rate_repo.current().await? {
        return Ok(Json(rate));
    }

    let seeded = state.exchange_rate_repo.create(&ExchangeRate::default()).await?;
    info!("Seeded default exchange rate {}", seeded.eur_to_mkd);
    Ok(Json(seeded))
}

pub async fn update_exchange_rate(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<UpdateExchangeRateRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::UpdateExchangeRate)?;
    if !payload.eur_to_mkd.is_finite() || payload.eur_to_mkd <= 0.0 {
        return Err(AppError::Validation("Exchange rate must be a positive number".into()));
    }

    let rate = ExchangeRate::new(payload.eur_to_mkd, Some(user.user_id.clone()));
    let created = state.exchange_rate_repo.create(&rate).await?;
    activity::record(state.activity_repo.as_ref(), &user, action::UPDATED, "exchange_rate", Some(&created.rate_id), Some(created.eur_to_mkd.to_string())).await;

    info!("Exchange rate set to {} by {}", created.eur_to_mkd, user.user_id);
    Ok(Json(created))
}
