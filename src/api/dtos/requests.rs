use serde::Deserialize;

use crate::domain::models::appointment::AppointmentSlot;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub access_token: String,
}

#[derive(Deserialize)]
pub struct DevLoginRequest {
    pub email: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Deserialize)]
pub struct UpdateExchangeRateRequest {
    pub eur_to_mkd: f64,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: String,
    #[serde(flatten)]
    pub slot: AppointmentSlot,
    #[serde(default = "default_true")]
    pub send_email: bool,
}

#[derive(Deserialize, Default)]
pub struct PatientFilter {
    pub patient_id: Option<String>,
}

/// Inclusive `YYYY-MM-DD` bounds plus an optional currency.
#[derive(Deserialize, Default)]
pub struct LedgerFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub currency: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct MonthlyReportQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Deserialize, Default)]
pub struct ActivityLogQuery {
    pub limit: Option<i64>,
}

#[derive(Deserialize, Default)]
pub struct ExportQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
