use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{
    ActivityLogRepository, AppointmentRepository, EmailService, ExchangeRateRepository,
    IdentityProvider, InvoiceRepository, LedgerRepository, PatientRepository,
    SessionRepository, UserRepository,
};
use crate::domain::services::{
    auth_gate::AuthGate,
    auth_service::AuthService,
    notification::{load_templates, AppointmentNotifier},
};

/// One adapter per store port, all backed by the same pool.
pub struct Repositories {
    pub user_repo: Arc<dyn UserRepository>,
    pub session_repo: Arc<dyn SessionRepository>,
    pub patient_repo: Arc<dyn PatientRepository>,
    pub invoice_repo: Arc<dyn InvoiceRepository>,
    pub ledger_repo: Arc<dyn LedgerRepository>,
    pub exchange_rate_repo: Arc<dyn ExchangeRateRepository>,
    pub activity_repo: Arc<dyn ActivityLogRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub session_repo: Arc<dyn SessionRepository>,
    pub patient_repo: Arc<dyn PatientRepository>,
    pub invoice_repo: Arc<dyn InvoiceRepository>,
    pub ledger_repo: Arc<dyn LedgerRepository>,
    pub exchange_rate_repo: Arc<dyn ExchangeRateRepository>,
    pub activity_repo: Arc<dyn ActivityLogRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub auth_gate: Arc<AuthGate>,
    pub auth_service: Arc<AuthService>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub email_service: Arc<dyn EmailService>,
    pub notifier: Arc<AppointmentNotifier>,
}

impl AppState {
    pub fn assemble(
        config: Config,
        repos: Repositories,
        email_service: Arc<dyn EmailService>,
        identity_provider: Arc<dyn IdentityProvider>,
    ) -> Result<Self, tera::Error> {
        let templates = Arc::new(load_templates()?);

        let auth_gate = Arc::new(AuthGate::new(repos.session_repo.clone(), repos.user_repo.clone()));
        let auth_service = Arc::new(AuthService::new(
            repos.user_repo.clone(),
            repos.session_repo.clone(),
            repos.activity_repo.clone(),
            &config,
        ));
        let notifier = Arc::new(AppointmentNotifier::new(email_service.clone(), templates, config.clinic.clone()));

        Ok(Self {
            config,
            user_repo: repos.user_repo,
            session_repo: repos.session_repo,
            patient_repo: repos.patient_repo,
            invoice_repo: repos.invoice_repo,
            ledger_repo: repos.ledger_repo,
            exchange_rate_repo: repos.exchange_rate_repo,
            activity_repo: repos.activity_repo,
            appointment_repo: repos.appointment_repo,
            auth_gate,
            auth_service,
            identity_provider,
            email_service,
            notifier,
        })
    }
}
