use std::sync::Arc;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::{
    models::{auth::AuthFailure, user::User},
    ports::{SessionRepository, UserRepository},
};
use crate::error::AppError;

pub const SESSION_COOKIE: &str = "session_token";

/// Turns an inbound session credential into the user that owns it.
///
/// Read-only: expired sessions are reported, never cleaned up here.
pub struct AuthGate {
    sessions: Arc<dyn SessionRepository>,
    users: Arc<dyn UserRepository>,
}

impl AuthGate {
    pub fn new(sessions: Arc<dyn SessionRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { sessions, users }
    }

    pub async fn resolve(&self, token: Option<&str>) -> Result<User, AppError> {
        self.resolve_at(token, Utc::now()).await
    }

    pub async fn resolve_at(&self, token: Option<&str>, now: DateTime<Utc>) -> Result<User, AppError> {
        let token = token.ok_or(AuthFailure::MissingCredential)?;

        let session = self.sessions
            .find_by_token_hash(&hash_token(token))
            .await?
            .ok_or(AuthFailure::InvalidSession)?;

        if session.is_expired_at(now) {
            debug!("Session for user {} expired at {}", session.user_id, session.expires_at.as_str());
            return Err(AuthFailure::SessionExpired.into());
        }

        let user = self.users
            .find_by_id(&session.user_id)
            .await?
            .ok_or(AuthFailure::UserNotFound)?;

        Ok(user)
    }
}

/// Picks the credential to present to the gate. The cookie wins over the header.
pub fn select_credential(cookie: Option<&str>, authorization: Option<&str>) -> Option<String> {
    if let Some(value) = cookie.filter(|v| !v.is_empty()) {
        return Some(value.to_string());
    }

    authorization
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
