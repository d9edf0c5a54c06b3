use serde::Serialize;
use std::env;

#[derive(Clone, Debug, Serialize)]
pub struct ClinicProfile {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub is_production: bool,
    /// Rejects every `/api` request outside the auth allow-list with 503.
    pub lockdown_mode: bool,
    /// Emails provisioned straight to admin on first sign-in.
    pub admin_emails: Vec<String>,
    pub session_ttl_days: i64,
    pub dev_login_enabled: bool,
    pub frontend_url: String,
    pub cors_origins: Vec<String>,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub identity_userinfo_url: String,
    pub clinic: ClinicProfile,
}

impl Config {
    pub fn from_env() -> Self {
        let is_production = env::var("ENVIRONMENT").map(|v| v == "production").unwrap_or(false);

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            is_production,
            lockdown_mode: flag("LOCKDOWN_MODE", false),
            admin_emails: list("ADMIN_EMAILS", ""),
            session_ttl_days: env::var("SESSION_TTL_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .expect("SESSION_TTL_DAYS must be a number"),
            dev_login_enabled: flag("DEV_LOGIN_ENABLED", !is_production),
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
            cors_origins: list("CORS_ORIGINS", "http://localhost:3000,http://127.0.0.1:3000,http://localhost:5173"),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_default(),
            identity_userinfo_url: env::var("IDENTITY_USERINFO_URL")
                .unwrap_or_else(|_| "https://openidconnect.googleapis.com/v1/userinfo".to_string()),
            clinic: ClinicProfile {
                name: env::var("CLINIC_NAME").unwrap_or_else(|_| "Clinic".to_string()),
                address: env::var("CLINIC_ADDRESS").unwrap_or_default(),
                phone: env::var("CLINIC_PHONE").unwrap_or_default(),
                email: env::var("CLINIC_EMAIL").unwrap_or_default(),
            },
        }
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails.iter().any(|e| e == email)
    }
}

fn flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

fn list(key: &str, default: &str) -> Vec<String> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
