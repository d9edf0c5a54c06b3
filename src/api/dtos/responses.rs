use serde::Serialize;

use crate::config::ClinicProfile;
use crate::domain::models::{
    appointment::Appointment,
    invoice::Invoice,
    patient::Patient,
    user::User,
};
use crate::domain::services::ledger_aggregator::LedgerSummary;

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub user: User,
    /// Same value as the cookie, for clients that send a bearer header instead.
    pub session_token: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: &'static str,
    pub database: &'static str,
}

#[derive(Serialize)]
pub struct DashboardStats {
    #[serde(flatten)]
    pub ledger: LedgerSummary,
    pub patients_count: i64,
    pub invoices_pending: i64,
}

#[derive(Serialize)]
pub struct InvoicePrintResponse {
    pub invoice: Invoice,
    pub patient: Option<Patient>,
    pub exchange_rate: f64,
    pub clinic: ClinicProfile,
}

#[derive(Serialize)]
pub struct AppointmentCreatedResponse {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub email_sent: bool,
}
