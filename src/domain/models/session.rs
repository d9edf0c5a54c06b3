use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::timestamp::StoredTimestamp;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct UserSession {
    /// SHA-256 of the raw token; the raw value only ever lives in the cookie.
    pub token_hash: String,
    pub user_id: String,
    pub expires_at: StoredTimestamp,
    pub created_at: DateTime<Utc>,
}

impl UserSession {
    pub fn new(token_hash: String, user_id: String, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            token_hash,
            user_id,
            expires_at: StoredTimestamp::from(now + ttl),
            created_at: now,
        }
    }

    /// A session whose expiry cannot be read is treated as already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at.resolve() {
            Some(expires_at) => expires_at < now,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_is_checked_against_the_given_instant() {
        let session = UserSession::new("hash".into(), "user_1".into(), Duration::days(7));
        assert!(!session.is_expired_at(Utc::now()));
        assert!(session.is_expired_at(Utc::now() + Duration::days(8)));
    }

    #[test]
    fn test_unreadable_expiry_counts_as_expired() {
        let mut session = UserSession::new("hash".into(), "user_1".into(), Duration::days(7));
        session.expires_at = StoredTimestamp::from_raw("not-a-date");
        assert!(session.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_naive_expiry_is_read_as_utc() {
        let mut session = UserSession::new("hash".into(), "user_1".into(), Duration::days(7));
        session.expires_at = StoredTimestamp::from_raw("2030-01-01T00:00:00");
        assert!(!session.is_expired_at(Utc::now()));
        session.expires_at = StoredTimestamp::from_raw("2001-01-01T00:00:00");
        assert!(session.is_expired_at(Utc::now()));
    }
}
