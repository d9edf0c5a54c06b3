use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header::AUTHORIZATION, request::Parts},
};
use crate::state::AppState;
use crate::domain::models::user::User;
use crate::domain::services::auth_gate::{select_credential, SESSION_COOKIE};
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::Span;

/// The user behind the request's session credential, whatever their role.
/// Handlers still run the role policy on it.
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookie_token = parts.extensions
            .get::<Cookies>()
            .and_then(|cookies| cookies.get(SESSION_COOKIE))
            .map(|cookie| cookie.value().to_string());

        let header = parts.headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let token = select_credential(cookie_token.as_deref(), header);

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let user = app_state.auth_gate.resolve(token.as_deref()).await?;

        Span::current().record("user_id", user.user_id.as_str());

        Ok(AuthUser(user))
    }
}
