use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

/// Routes still served while the service is locked down.
pub const LOCKDOWN_ALLOW_LIST: &[&str] = &[
    "/api/auth/login",
    "/api/auth/logout",
    "/api/auth/me",
    "/api/auth/dev-login",
];

pub fn is_blocked(lockdown: bool, path: &str) -> bool {
    if !lockdown {
        return false;
    }
    let under_api = path == "/api" || path.starts_with("/api/");
    under_api && !LOCKDOWN_ALLOW_LIST.contains(&path)
}

pub async fn lockdown_guard(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    if is_blocked(state.config.lockdown_mode, request.uri().path()) {
        info!("Lockdown: refused {} {}", request.method(), request.uri().path());
        return AppError::Maintenance.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_auth_routes_pass_during_lockdown() {
        assert!(is_blocked(true, "/api/patients"));
        assert!(is_blocked(true, "/api/auth/login/extra"));
        assert!(!is_blocked(true, "/api/auth/login"));
        assert!(!is_blocked(true, "/api/auth/me"));
        assert!(!is_blocked(true, "/health"));
    }

    #[test]
    fn test_nothing_is_blocked_when_open() {
        assert!(!is_blocked(false, "/api/patients"));
    }
}
