pub mod mapper;
pub mod rows;

pub mod sqlite_activity_repo;
pub mod sqlite_appointment_repo;
pub mod sqlite_exchange_rate_repo;
pub mod sqlite_invoice_repo;
pub mod sqlite_ledger_repo;
pub mod sqlite_patient_repo;
pub mod sqlite_session_repo;
pub mod sqlite_user_repo;

pub mod postgres_activity_repo;
pub mod postgres_appointment_repo;
pub mod postgres_exchange_rate_repo;
pub mod postgres_invoice_repo;
pub mod postgres_ledger_repo;
pub mod postgres_patient_repo;
pub mod postgres_session_repo;
pub mod postgres_user_repo;
