#![allow(dead_code)]

use clinic_backend::{
    api::router::create_router,
    config::{ClinicProfile, Config},
    domain::models::{auth::{AuthFailure, VerifiedIdentity}, user::{Role, User}},
    domain::ports::{EmailService, IdentityProvider},
    error::AppError,
    infra::factory::{run_sqlite_migrations, sqlite_repositories},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
    pub attachment_name: Option<String>,
}

#[derive(Default)]
pub struct MockEmailService {
    pub sent: Mutex<Vec<SentMail>>,
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        attachment_name: Option<&str>,
        _attachment_data: Option<&[u8]>,
    ) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(SentMail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
            attachment_name: attachment_name.map(String::from),
        });
        Ok(())
    }
}

/// Accepts only the access tokens registered in `identities`.
#[derive(Default)]
pub struct MockIdentityProvider {
    pub identities: Mutex<HashMap<String, VerifiedIdentity>>,
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn verify(&self, access_token: &str) -> Result<VerifiedIdentity, AppError> {
        self.identities
            .lock()
            .unwrap()
            .get(access_token)
            .cloned()
            .ok_or(AppError::Unauthenticated(AuthFailure::IdentityRejected))
    }
}

pub fn test_config(database_url: &str) -> Config {
    Config {
        database_url: database_url.to_string(),
        port: 0,
        is_production: false,
        lockdown_mode: false,
        admin_emails: vec![],
        session_ttl_days: 7,
        dev_login_enabled: true,
        frontend_url: "http://localhost:3000".to_string(),
        cors_origins: vec!["http://localhost:3000".to_string()],
        mail_service_url: "http://localhost".to_string(),
        mail_service_token: "token".to_string(),
        identity_userinfo_url: "http://localhost/userinfo".to_string(),
        clinic: ClinicProfile {
            name: "Test Clinic".to_string(),
            address: "1 Main St".to_string(),
            phone: "+389 2 000 000".to_string(),
            email: "front@clinic.test".to_string(),
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub email: Arc<MockEmailService>,
    pub identity: Arc<MockIdentityProvider>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool).await;

        let mut config = test_config(&db_url);
        customize(&mut config);

        let email = Arc::new(MockEmailService::default());
        let identity = Arc::new(MockIdentityProvider::default());
        let state = Arc::new(
            AppState::assemble(config, sqlite_repositories(&pool), email.clone(), identity.clone())
                .expect("Failed to assemble state"),
        );
        let router = create_router(state.clone());

        Self { router, pool, db_filename, state, email, identity }
    }

    pub async fn request(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    /// Signs in through the development login and returns the session token.
    pub async fn dev_login(&self, email: &str, name: &str) -> String {
        let response = self.request(
            "POST",
            "/api/auth/dev-login",
            None,
            Some(serde_json::json!({ "email": email, "name": name })),
        ).await;

        if response.status() != StatusCode::OK {
            panic!("Dev login failed in test helper: status {}", response.status());
        }
        let body = parse_body(response).await;
        body["session_token"].as_str().expect("No session_token in body").to_string()
    }

    /// First sign-in on an empty store, so always an admin.
    pub async fn admin(&self) -> String {
        self.dev_login("admin@clinic.test", "Admin").await
    }

    /// Signs in a second user and promotes them to staff.
    pub async fn staff(&self, admin_token: &str, email: &str) -> String {
        let token = self.dev_login(email, "Staff Member").await;
        let user = self.user_by_email(email).await;
        let response = self.request(
            "PUT",
            &format!("/api/users/{}/role", user.user_id),
            Some(admin_token),
            Some(serde_json::json!({ "role": "staff" })),
        ).await;
        assert_eq!(response.status(), StatusCode::OK);
        token
    }

    pub async fn user_by_email(&self, email: &str) -> User {
        self.state.user_repo.find_by_email(email).await.unwrap().expect("user exists")
    }

    pub async fn create_patient(&self, token: &str, first: &str, email: Option<&str>) -> Value {
        let response = self.request(
            "POST",
            "/api/patients",
            Some(token),
            Some(serde_json::json!({
                "first_name": first,
                "last_name": "Petrovski",
                "phone": "070123456",
                "email": email,
            })),
        ).await;
        assert_eq!(response.status(), StatusCode::OK);
        parse_body(response).await
    }

    pub fn register_identity(&self, access_token: &str, email: &str, name: &str) {
        self.identity.identities.lock().unwrap().insert(
            access_token.to_string(),
            VerifiedIdentity { email: email.to_string(), name: name.to_string(), picture: None },
        );
    }
}

pub fn role_of(body: &Value) -> Role {
    body["role"].as_str().unwrap().parse().unwrap()
}

pub async fn parse_body(response: Response) -> Value {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
}

pub async fn body_text(response: Response) -> String {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(body_bytes.to_vec()).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
