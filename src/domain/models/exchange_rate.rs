use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::new_id;

pub const DEFAULT_EUR_TO_MKD: f64 = 61.5;

/// One entry in the append-only rate history. The newest `updated_at` wins.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct ExchangeRate {
    pub rate_id: String,
    pub eur_to_mkd: f64,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<String>,
}

impl ExchangeRate {
    pub fn new(eur_to_mkd: f64, updated_by: Option<String>) -> Self {
        Self {
            rate_id: new_id("rate"),
            eur_to_mkd,
            updated_at: Utc::now(),
            updated_by,
        }
    }
}

impl Default for ExchangeRate {
    fn default() -> Self {
        Self::new(DEFAULT_EUR_TO_MKD, None)
    }
}
