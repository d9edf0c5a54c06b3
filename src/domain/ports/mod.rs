use crate::domain::models::{
    activity::ActivityLog,
    appointment::{Appointment, AppointmentStatus},
    auth::VerifiedIdentity,
    exchange_rate::ExchangeRate,
    invoice::{Invoice, InvoiceStatus},
    ledger::{CashInflow, CashOutflow},
    patient::Patient,
    session::UserSession,
    user::{Role, User},
};
use crate::error::AppError;
use async_trait::async_trait;

/// Upper bound on rows pulled into memory by any listing or aggregation scan.
pub const SCAN_LIMIT: i64 = 10_000;
pub const LIST_LIMIT: i64 = 1_000;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
    async fn update_profile(&self, id: &str, name: &str, picture: Option<&str>) -> Result<(), AppError>;
    async fn update_role(&self, id: &str, role: Role) -> Result<(), AppError>;
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Drops every session the user holds and stores `session`, atomically.
    async fn replace_for_user(&self, session: &UserSession) -> Result<(), AppError>;
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<UserSession>, AppError>;
    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_for_user(&self, user_id: &str) -> Result<u64, AppError>;
}

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn create(&self, patient: &Patient) -> Result<Patient, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Patient>, AppError>;
    async fn list(&self) -> Result<Vec<Patient>, AppError>;
    async fn update(&self, patient: &Patient) -> Result<Patient, AppError>;
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn create(&self, invoice: &Invoice) -> Result<Invoice, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>, AppError>;
    async fn list(&self, patient_id: Option<&str>) -> Result<Vec<Invoice>, AppError>;
    async fn update(&self, invoice: &Invoice) -> Result<Invoice, AppError>;
    async fn update_status(&self, id: &str, status: InvoiceStatus) -> Result<bool, AppError>;
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
    async fn count_by_status(&self, status: InvoiceStatus) -> Result<i64, AppError>;
}

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn create_inflow(&self, inflow: &CashInflow) -> Result<CashInflow, AppError>;
    async fn find_inflow(&self, id: &str) -> Result<Option<CashInflow>, AppError>;
    /// Newest first, at most `limit` rows.
    async fn list_inflows(&self, limit: i64) -> Result<Vec<CashInflow>, AppError>;
    async fn update_inflow(&self, inflow: &CashInflow) -> Result<CashInflow, AppError>;
    async fn delete_inflow(&self, id: &str) -> Result<bool, AppError>;

    async fn create_outflow(&self, outflow: &CashOutflow) -> Result<CashOutflow, AppError>;
    async fn find_outflow(&self, id: &str) -> Result<Option<CashOutflow>, AppError>;
    async fn list_outflows(&self, limit: i64) -> Result<Vec<CashOutflow>, AppError>;
    async fn update_outflow(&self, outflow: &CashOutflow) -> Result<CashOutflow, AppError>;
    async fn delete_outflow(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ExchangeRateRepository: Send + Sync {
    async fn current(&self) -> Result<Option<ExchangeRate>, AppError>;
    async fn create(&self, rate: &ExchangeRate) -> Result<ExchangeRate, AppError>;
}

#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    async fn create(&self, log: &ActivityLog) -> Result<(), AppError>;
    async fn list_recent(&self, limit: i64) -> Result<Vec<ActivityLog>, AppError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError>;
    /// Latest date first.
    async fn list(&self, patient_id: Option<&str>) -> Result<Vec<Appointment>, AppError>;
    async fn update(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    async fn update_status(&self, id: &str, status: AppointmentStatus) -> Result<bool, AppError>;
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str, attachment_name: Option<&str>, attachment_data: Option<&[u8]>) -> Result<(), AppError>;
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchanges a provider access token for the identity it belongs to.
    async fn verify(&self, access_token: &str) -> Result<VerifiedIdentity, AppError>;
}
