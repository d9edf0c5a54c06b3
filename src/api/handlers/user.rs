use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::{requests::UpdateRoleRequest, responses::MessageResponse};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::{activity::action, user::Role};
use crate::domain::services::{activity, role_policy::{authorize, ensure_not_self, Operation}};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    authorize(&admin, Operation::ManageUsers)?;
    Ok(Json(state.user_repo.list().await?))
}

pub async fn update_role(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&admin, Operation::ManageUsers)?;
    let role: Role = payload.role.parse().map_err(AppError::Validation)?;

    let target = state.user_repo.find_by_id(&user_id).await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if target.role == role {
        return Ok(Json(MessageResponse::new("Role unchanged")));
    }

    state.user_repo.update_role(&user_id, role).await?;
    activity::record(state.activity_repo.as_ref(), &admin, action::ROLE_CHANGED, "user", Some(&user_id), Some(format!("{} -> {}", target.role, role))).await;

    info!("User {} role changed from {} to {}", user_id, target.role, role);
    Ok(Json(MessageResponse::new("Role updated")))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&admin, Operation::ManageUsers)?;
    ensure_not_self(&admin, &user_id)?;

    if !state.user_repo.delete(&user_id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    let revoked = state.session_repo.delete_for_user(&user_id).await?;
    activity::record(state.activity_repo.as_ref(), &admin, action::DELETED, "user", Some(&user_id), None).await;

    info!("Deleted user {} and {} session(s)", user_id, revoked);
    Ok(Json(MessageResponse::new("User deleted")))
}
