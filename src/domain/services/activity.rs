use tracing::warn;

use crate::domain::{
    models::{activity::ActivityLog, user::User},
    ports::ActivityLogRepository,
};

/// Appends an audit entry. A failed write is logged and otherwise ignored so
/// the mutation that triggered it still succeeds.
pub async fn record(
    repo: &dyn ActivityLogRepository,
    actor: &User,
    action: &str,
    entity_type: &str,
    entity_id: Option<&str>,
    details: Option<String>,
) {
    let entry = ActivityLog::new(actor, action, entity_type, entity_id, details);
    if let Err(e) = repo.create(&entry).await {
        warn!("Failed to record activity {} on {}: {}", action, entity_type, e);
    }
}
