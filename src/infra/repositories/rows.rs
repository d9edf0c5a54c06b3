//! Raw table shapes. Enumerated columns stay as text here and are checked
//! when converted into domain types in [`super::mapper`].

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::models::timestamp::StoredTimestamp;

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct InvoiceRow {
    pub invoice_id: String,
    pub invoice_number: String,
    pub patient_id: String,
    pub patient_name: String,
    pub items_json: String,
    pub subtotal: f64,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
    pub currency: String,
    pub status: String,
    pub issue_date: String,
    pub due_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

#[derive(Debug, FromRow)]
pub struct InflowRow {
    pub inflow_id: String,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub currency: String,
    pub payment_method: String,
    pub patient_id: Option<String>,
    pub invoice_id: Option<String>,
    pub recorded_at: StoredTimestamp,
    pub created_by: Option<String>,
}

#[derive(Debug, FromRow)]
pub struct OutflowRow {
    pub outflow_id: String,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub currency: String,
    pub recorded_at: StoredTimestamp,
    pub created_by: Option<String>,
}

#[derive(Debug, FromRow)]
pub struct AppointmentRow {
    pub appointment_id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub patient_email: Option<String>,
    pub date: String,
    pub time: String,
    pub reason: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

pub const USER_COLUMNS: &str = "user_id, email, name, picture, role, created_at";
pub const INVOICE_COLUMNS: &str = "invoice_id, invoice_number, patient_id, patient_name, items_json, subtotal, tax_rate, \
    tax_amount, total_amount, currency, status, issue_date, due_date, notes, created_at, created_by";
pub const INFLOW_COLUMNS: &str = "inflow_id, category, description, amount, currency, payment_method, patient_id, invoice_id, recorded_at, created_by";
pub const OUTFLOW_COLUMNS: &str = "outflow_id, category, description, amount, currency, recorded_at, created_by";
pub const APPOINTMENT_COLUMNS: &str = "appointment_id, patient_id, patient_name, patient_email, appointment_date AS date, appointment_time AS time, reason, status, notes, created_at, created_by";
pub const PATIENT_COLUMNS: &str = "patient_id, first_name, last_name, phone, email, address, notes, birth_date, created_at, created_by";
