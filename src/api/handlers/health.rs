use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::responses::HealthResponse;
use crate::state::AppState;
use std::sync::Arc;
use tracing::error;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let environment = if state.config.is_production { "production" } else { "development" };

    match state.user_repo.count().await {
        Ok(_) => (StatusCode::OK, Json(HealthResponse { status: "healthy", environment, database: "connected" })),
        Err(e) => {
            error!("Health probe failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse { status: "unhealthy", environment, database: "unreachable" }),
            )
        }
    }
}
