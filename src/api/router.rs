use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{
    activity, appointment, auth, exchange_rate, export, health, invoice, ledger, patient, report, user,
};
use crate::api::lockdown::lockdown_guard;
use tower_http::{
    classify::ServerErrorsFailureClass,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info, warn};
use uuid::Uuid;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/dev-login", post(auth::dev_login))
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", post(auth::logout))

        // Users
        .route("/users", get(user::list_users))
        .route("/users/{user_id}/role", put(user::update_role))
        .route("/users/{user_id}", delete(user::delete_user))

        // Patients
        .route("/patients", get(patient::list_patients).post(patient::create_patient))
        .route("/patients/{patient_id}", get(patient::get_patient).put(patient::update_patient).delete(patient::delete_patient))

        // Invoices
        .route("/invoices", get(invoice::list_invoices).post(invoice::create_invoice))
        .route("/invoices/{invoice_id}", get(invoice::get_invoice).put(invoice::update_invoice).delete(invoice::delete_invoice))
        .route("/invoices/{invoice_id}/print", get(invoice::print_invoice))

        // Ledger
        .route("/inflows", get(ledger::list_inflows).post(ledger::create_inflow))
        .route("/inflows/{inflow_id}", put(ledger::update_inflow).delete(ledger::delete_inflow))
        .route("/outflows", get(ledger::list_outflows).post(ledger::create_outflow))
        .route("/outflows/{outflow_id}", put(ledger::update_outflow).delete(ledger::delete_outflow))
        .route("/exchange-rate", get(exchange_rate::get_exchange_rate).put(exchange_rate::update_exchange_rate))

        // Reporting
        .route("/dashboard/stats", get(report::dashboard_stats))
        .route("/reports/monthly", get(report::monthly))
        .route("/activity-logs", get(activity::list_activity_logs))
        .route("/export/{format}", get(export::export_data))

        // Appointments
        .route("/appointments", get(appointment::list_appointments).post(appointment::create_appointment))
        .route("/appointments/{appointment_id}", put(appointment::update_appointment).delete(appointment::delete_appointment))
        .route("/appointments/{appointment_id}/status", put(appointment::update_appointment_status))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
        .layer(middleware::from_fn_with_state(state.clone(), lockdown_guard))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .layer(cors)
        .with_state(state)
}
