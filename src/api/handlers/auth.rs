use axum::{extract::State, http::{header::AUTHORIZATION, HeaderMap}, response::IntoResponse, Json};
use crate::api::dtos::{
    requests::{DevLoginRequest, LoginRequest},
    responses::{MessageResponse, SessionResponse},
};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::auth::VerifiedIdentity;
use crate::domain::models::user::User;
use crate::domain::services::auth_gate::{select_credential, SESSION_COOKIE};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tower_cookies::{Cookie, Cookies};
use tower_cookies::cookie::SameSite;
use tracing::info;

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let identity = state.identity_provider.verify(&payload.access_token).await?;
    let user = state.auth_service.provision(identity).await?;
    open_session(&state, &cookies, user).await
}

pub async fn dev_login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<DevLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if state.config.lockdown_mode || !state.config.dev_login_enabled {
        return Err(AppError::Forbidden("Development login is disabled".into()));
    }
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }

    let identity = VerifiedIdentity { email: payload.email, name: payload.name, picture: None };
    let user = state.auth_service.provision(identity).await?;
    open_session(&state, &cookies, user).await
}

async fn open_session(state: &AppState, cookies: &Cookies, user: User) -> Result<Json<SessionResponse>, AppError> {
    let session_token = state.auth_service.start_session(&user).await?;
    cookies.add(session_cookie(state, session_token.clone()));

    info!("User signed in: {} ({})", user.user_id, user.role);
    Ok(Json(SessionResponse { user, session_token }))
}

pub async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let cookie_token = cookies.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());

    if let Some(token) = select_credential(cookie_token.as_deref(), header) {
        state.auth_service.logout(&token).await?;
    }

    cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").into());

    info!("User logged out");
    Ok(Json(MessageResponse::new("Logged out")))
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let production = state.config.is_production;
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_secure(production);
    cookie.set_same_site(if production { SameSite::None } else { SameSite::Lax });
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::days(state.config.session_ttl_days));
    cookie
}
