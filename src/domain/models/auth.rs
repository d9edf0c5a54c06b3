use serde::Deserialize;
use thiserror::Error;

/// Why a credential did not resolve to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("missing credential")]
    MissingCredential,
    #[error("invalid session")]
    InvalidSession,
    #[error("session expired")]
    SessionExpired,
    #[error("user not found")]
    UserNotFound,
    #[error("identity verification failed")]
    IdentityRejected,
}

/// What an identity provider vouches for once it has verified a sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedIdentity {
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}
