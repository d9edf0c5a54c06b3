use axum::{extract::{Query, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::ActivityLogQuery;
use crate::api::extractors::auth::AuthUser;
use crate::domain::ports::LIST_LIMIT;
use crate::domain::services::role_policy::{authorize, Operation};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

const DEFAULT_LIMIT: i64 = 100;

pub async fn list_activity_logs(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<ActivityLogQuery>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, Operation::ReadActivityLog)?;

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, LIST_LIMIT);
    Ok(Json(state.activity_repo.list_recent(limit).await?))
}
