use std::sync::Arc;
use chrono::Duration;
use rand::{distributions::Alphanumeric, Rng};
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{
    models::{
        activity::action,
        auth::VerifiedIdentity,
        session::UserSession,
        user::{Role, User},
    },
    ports::{ActivityLogRepository, SessionRepository, UserRepository},
    services::{activity, auth_gate::hash_token},
};
use crate::error::AppError;

const TOKEN_LENGTH: usize = 64;

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    activity: Arc<dyn ActivityLogRepository>,
    admin_emails: Vec<String>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        activity: Arc<dyn ActivityLogRepository>,
        config: &Config,
    ) -> Self {
        Self {
            users,
            sessions,
            activity,
            admin_emails: config.admin_emails.clone(),
            session_ttl: Duration::days(config.session_ttl_days),
        }
    }

    /// Finds or creates the user behind a verified identity.
    ///
    /// Known users get their profile refreshed and keep their role. New users
    /// become admin when the directory is empty or their email is allow-listed,
    /// and pending otherwise. Counting then inserting is not atomic; two
    /// simultaneous first sign-ins for the same email are settled by the unique
    /// index on `users.email`, after which the stored row is returned.
    pub async fn provision(&self, identity: VerifiedIdentity) -> Result<User, AppError> {
        if let Some(mut existing) = self.users.find_by_email(&identity.email).await? {
            self.users.update_profile(&existing.user_id, &identity.name, identity.picture.as_deref()).await?;
            existing.name = identity.name;
            existing.picture = identity.picture;
            return Ok(existing);
        }

        let role = self.bootstrap_role(&identity.email).await?;
        let user = User::new(identity.email, identity.name, identity.picture, role);

        let created = match self.users.create(&user).await {
            Ok(created) => created,
            Err(e) if e.is_unique_violation() => {
                warn!("Concurrent sign-up for {}, using the stored user", user.email);
                return self.users
                    .find_by_email(&user.email)
                    .await?
                    .ok_or(AppError::Internal);
            }
            Err(e) => return Err(e),
        };

        let event = if created.role == Role::Pending { action::REGISTERED_PENDING } else { action::REGISTERED };
        activity::record(self.activity.as_ref(), &created, event, "user", Some(&created.user_id), Some(created.role.to_string())).await;
        info!("Provisioned user {} with role {}", created.user_id, created.role);

        Ok(created)
    }

    async fn bootstrap_role(&self, email: &str) -> Result<Role, AppError> {
        if self.users.count().await? == 0 {
            return Ok(Role::Admin);
        }
        if self.admin_emails.iter().any(|e| e == email) {
            return Ok(Role::Admin);
        }
        Ok(Role::Pending)
    }

    /// Issues a fresh session for `user`, revoking every session it held before.
    /// Returns the raw token; only its hash is stored.
    pub async fn start_session(&self, user: &User) -> Result<String, AppError> {
        let raw_token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();

        let session = UserSession::new(hash_token(&raw_token), user.user_id.clone(), self.session_ttl);
        self.sessions.replace_for_user(&session).await?;

        Ok(raw_token)
    }

    pub async fn logout(&self, raw_token: &str) -> Result<(), AppError> {
        self.sessions.delete_by_token_hash(&hash_token(raw_token)).await
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }
}
