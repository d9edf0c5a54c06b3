pub mod activity;
pub mod appointment;
pub mod auth;
pub mod exchange_rate;
pub mod invoice;
pub mod ledger;
pub mod patient;
pub mod session;
pub mod timestamp;
pub mod user;

use uuid::Uuid;

/// Prefixed opaque identifier, e.g. `pat_1a2b3c4d5e6f`.
pub fn new_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &hex[..12])
}
