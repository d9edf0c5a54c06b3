use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::{AppState, Repositories};
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::identity::http_identity_provider::HttpIdentityProvider;
use crate::infra::repositories::{
    postgres_activity_repo::PostgresActivityRepo, postgres_appointment_repo::PostgresAppointmentRepo,
    postgres_exchange_rate_repo::PostgresExchangeRateRepo, postgres_invoice_repo::PostgresInvoiceRepo,
    postgres_ledger_repo::PostgresLedgerRepo, postgres_patient_repo::PostgresPatientRepo,
    postgres_session_repo::PostgresSessionRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_activity_repo::SqliteActivityRepo, sqlite_appointment_repo::SqliteAppointmentRepo,
    sqlite_exchange_rate_repo::SqliteExchangeRateRepo, sqlite_invoice_repo::SqliteInvoiceRepo,
    sqlite_ledger_repo::SqliteLedgerRepo, sqlite_patient_repo::SqlitePatientRepo,
    sqlite_session_repo::SqliteSessionRepo, sqlite_user_repo::SqliteUserRepo,
};

pub fn sqlite_repositories(pool: &SqlitePool) -> Repositories {
    Repositories {
        user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
        session_repo: Arc::new(SqliteSessionRepo::new(pool.clone())),
        patient_repo: Arc::new(SqlitePatientRepo::new(pool.clone())),
        invoice_repo: Arc::new(SqliteInvoiceRepo::new(pool.clone())),
        ledger_repo: Arc::new(SqliteLedgerRepo::new(pool.clone())),
        exchange_rate_repo: Arc::new(SqliteExchangeRateRepo::new(pool.clone())),
        activity_repo: Arc::new(SqliteActivityRepo::new(pool.clone())),
        appointment_repo: Arc::new(SqliteAppointmentRepo::new(pool.clone())),
    }
}

pub fn postgres_repositories(pool: &PgPool) -> Repositories {
    Repositories {
        user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
        session_repo: Arc::new(PostgresSessionRepo::new(pool.clone())),
        patient_repo: Arc::new(PostgresPatientRepo::new(pool.clone())),
        invoice_repo: Arc::new(PostgresInvoiceRepo::new(pool.clone())),
        ledger_repo: Arc::new(PostgresLedgerRepo::new(pool.clone())),
        exchange_rate_repo: Arc::new(PostgresExchangeRateRepo::new(pool.clone())),
        activity_repo: Arc::new(PostgresActivityRepo::new(pool.clone())),
        appointment_repo: Arc::new(PostgresAppointmentRepo::new(pool.clone())),
    }
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
        config.clinic.name.clone(),
    ));
    let identity_provider = Arc::new(HttpIdentityProvider::new(config.identity_userinfo_url.clone()));

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        postgres_repositories(&pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        sqlite_repositories(&pool)
    };

    AppState::assemble(config.clone(), repos, email_service, identity_provider)
        .expect("Failed to load email templates")
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
