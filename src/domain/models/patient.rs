use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::new_id;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Patient {
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub birth_date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatientDetails {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub birth_date: Option<String>,
}

impl Patient {
    pub fn new(details: PatientDetails, created_by: Option<String>) -> Self {
        Self {
            patient_id: new_id("pat"),
            first_name: details.first_name,
            last_name: details.last_name,
            phone: details.phone,
            email: details.email,
            address: details.address,
            notes: details.notes,
            birth_date: details.birth_date,
            created_at: Utc::now(),
            created_by,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn apply(&mut self, details: PatientDetails) {
        self.first_name = details.first_name;
        self.last_name = details.last_name;
        self.phone = details.phone;
        self.email = details.email;
        self.address = details.address;
        self.notes = details.notes;
        self.birth_date = details.birth_date;
    }
}
