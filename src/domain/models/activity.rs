use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::{new_id, user::User};

pub mod action {
    pub const REGISTERED: &str = "REGISTERED";
    pub const REGISTERED_PENDING: &str = "REGISTERED_PENDING";
    pub const CREATED: &str = "CREATED";
    pub const UPDATED: &str = "UPDATED";
    pub const DELETED: &str = "DELETED";
    pub const ROLE_CHANGED: &str = "ROLE_CHANGED";
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct ActivityLog {
    pub log_id: String,
    pub user_id: String,
    pub user_name: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ActivityLog {
    pub fn new(actor: &User, action: &str, entity_type: &str, entity_id: Option<&str>, details: Option<String>) -> Self {
        Self {
            log_id: new_id("log"),
            user_id: actor.user_id.clone(),
            user_name: actor.name.clone(),
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.map(String::from),
            details,
            timestamp: Utc::now(),
        }
    }
}
