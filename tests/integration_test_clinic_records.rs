mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_patient_crud_round_trip() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let staff = app.staff(&admin, "staff@clinic.test").await;

    let created = app.create_patient(&staff, "Elena", Some("elena@mail.test")).await;
    let id = created["patient_id"].as_str().unwrap().to_string();
    assert!(id.starts_with("pat_"));

    let res = app.request("PUT", &format!("/api/patients/{}", id), Some(&staff), Some(json!({
        "first_name": "Elena",
        "last_name": "Stojanova",
        "phone": "071000000",
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let fetched = parse_body(app.request("GET", &format!("/api/patients/{}", id), Some(&staff), None).await).await;
    assert_eq!(fetched["last_name"], "Stojanova");
    assert_eq!(fetched["phone"], "071000000");
    assert!(fetched["email"].is_null());

    let res = app.request("DELETE", &format!("/api/patients/{}", id), Some(&staff), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.request("DELETE", &format!("/api/patients/{}", id), Some(&admin), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.request("GET", &format!("/api/patients/{}", id), Some(&admin), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patient_requires_names() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    let res = app.request("POST", "/api/patients", Some(&admin), Some(json!({ "first_name": " ", "last_name": "X" }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invoice_defaults_and_patient_filter() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let patient = app.create_patient(&admin, "Ivan", None).await;
    let patient_id = patient["patient_id"].as_str().unwrap();

    let res = app.request("POST", "/api/invoices", Some(&admin), Some(json!({
        "patient_id": patient_id,
        "items": [{ "description": "Checkup", "quantity": 1, "unit_price": 1000, "total": 1000 }],
        "subtotal": 1000,
        "tax_amount": 180,
        "total_amount": 1180,
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let invoice = parse_body(res).await;
    assert!(invoice["invoice_number"].as_str().unwrap().starts_with("INV-"));
    assert_eq!(invoice["patient_name"], "Ivan Petrovski");
    assert_eq!(invoice["tax_rate"], 18.0);
    assert_eq!(invoice["currency"], "MKD");
    assert_eq!(invoice["status"], "draft");
    assert_eq!(invoice["items"][0]["description"], "Checkup");

    let res = app.request("POST", "/api/invoices", Some(&admin), Some(json!({
        "patient_id": "pat_missing",
        "invoice_number": "INV-MANUAL-1",
    }))).await;
    let orphan = parse_body(res).await;
    assert_eq!(orphan["patient_name"], "Unknown");
    assert_eq!(orphan["invoice_number"], "INV-MANUAL-1");

    let all = parse_body(app.request("GET", "/api/invoices", Some(&admin), None).await).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let filtered = parse_body(app.request("GET", &format!("/api/invoices?patient_id={}", patient_id), Some(&admin), None).await).await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invoice_update_and_print() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let staff = app.staff(&admin, "staff@clinic.test").await;
    let patient = app.create_patient(&admin, "Jana", Some("jana@mail.test")).await;
    let patient_id = patient["patient_id"].as_str().unwrap();

    let invoice = parse_body(app.request("POST", "/api/invoices", Some(&staff), Some(json!({
        "patient_id": patient_id,
        "total_amount": 50,
        "currency": "EUR",
    }))).await).await;
    let id = invoice["invoice_id"].as_str().unwrap();

    let res = app.request("PUT", &format!("/api/invoices/{}", id), Some(&staff), Some(json!({
        "patient_id": patient_id,
        "total_amount": 75,
        "currency": "EUR",
        "status": "sent",
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = parse_body(res).await;
    assert_eq!(updated["status"], "sent");
    assert_eq!(updated["invoice_number"], invoice["invoice_number"]);

    let res = app.request("GET", &format!("/api/invoices/{}/print", id), Some(&staff), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let print = parse_body(res).await;
    assert_eq!(print["invoice"]["total_amount"], 75.0);
    assert_eq!(print["patient"]["email"], "jana@mail.test");
    assert_eq!(print["exchange_rate"], 61.5);
    assert_eq!(print["clinic"]["name"], "Test Clinic");

    let res = app.request("PUT", "/api/invoices/inv_missing", Some(&staff), Some(json!({ "patient_id": patient_id }))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.request("DELETE", &format!("/api/invoices/{}", id), Some(&staff), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let res = app.request("DELETE", &format!("/api/invoices/{}", id), Some(&admin), None).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_invoice_rejects_negative_amounts() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    let res = app.request("POST", "/api/invoices", Some(&admin), Some(json!({
        "patient_id": "pat_1",
        "total_amount": -5,
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_appointment_confirmation_is_emailed() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let patient = app.create_patient(&admin, "Sara", Some("sara@mail.test")).await;

    let res = app.request("POST", "/api/appointments", Some(&admin), Some(json!({
        "patient_id": patient["patient_id"],
        "date": "2030-05-10",
        "time": "09:30",
        "reason": "Cleaning",
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["email_sent"], true);
    assert_eq!(body["status"], "scheduled");
    assert_eq!(body["patient_name"], "Sara Petrovski");

    let sent = app.email.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "sara@mail.test");
    assert_eq!(sent[0].attachment_name.as_deref(), Some("appointment.ics"));
    assert!(sent[0].html_body.contains("Sara Petrovski"));
    assert!(sent[0].html_body.contains("Test Clinic"));
}

#[tokio::test]
async fn test_appointment_email_requires_patient_address() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let patient = app.create_patient(&admin, "Noemail", None).await;

    let res = app.request("POST", "/api/appointments", Some(&admin), Some(json!({
        "patient_id": patient["patient_id"],
        "date": "2030-05-10",
        "time": "09:30",
        "reason": "Checkup",
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let listed = parse_body(app.request("GET", "/api/appointments", Some(&admin), None).await).await;
    assert!(listed.as_array().unwrap().is_empty());

    let res = app.request("POST", "/api/appointments", Some(&admin), Some(json!({
        "patient_id": patient["patient_id"],
        "date": "2030-05-10",
        "time": "09:30",
        "reason": "Checkup",
        "send_email": false,
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["email_sent"], false);
    assert!(app.email.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_appointment_lifecycle() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let staff = app.staff(&admin, "staff@clinic.test").await;
    let patient = app.create_patient(&staff, "Luka", None).await;

    let res = app.request("POST", "/api/appointments", Some(&staff), Some(json!({
        "patient_id": patient["patient_id"],
        "date": "10/05/2030",
        "time": "09:30",
        "reason": "Checkup",
        "send_email": false,
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.request("POST", "/api/appointments", Some(&staff), Some(json!({
        "patient_id": "pat_missing",
        "date": "2030-05-10",
        "time": "09:30",
        "reason": "Checkup",
        "send_email": false,
    }))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let created = parse_body(app.request("POST", "/api/appointments", Some(&staff), Some(json!({
        "patient_id": patient["patient_id"],
        "date": "2030-05-10",
        "time": "09:30",
        "reason": "Checkup",
        "send_email": false,
    }))).await).await;
    let id = created["appointment_id"].as_str().unwrap();

    let res = app.request("PUT", &format!("/api/appointments/{}", id), Some(&staff), Some(json!({
        "date": "2030-05-11",
        "time": "14:00",
        "reason": "Follow-up",
        "notes": "Bring x-rays",
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let moved = parse_body(res).await;
    assert_eq!(moved["date"], "2030-05-11");
    assert_eq!(moved["time"], "14:00");

    let res = app.request("PUT", &format!("/api/appointments/{}/status", id), Some(&staff), Some(json!({ "status": "finished" }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.request("PUT", &format!("/api/appointments/{}/status", id), Some(&staff), Some(json!({ "status": "completed" }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.request("PUT", "/api/appointments/apt_missing/status", Some(&staff), Some(json!({ "status": "completed" }))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let listed = parse_body(app.request("GET", &format!("/api/appointments?patient_id={}", patient["patient_id"].as_str().unwrap()), Some(&staff), None).await).await;
    assert_eq!(listed[0]["status"], "completed");
    assert_eq!(listed[0]["notes"], "Bring x-rays");

    let res = app.request("DELETE", &format!("/api/appointments/{}", id), Some(&staff), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = app.request("DELETE", &format!("/api/appointments/{}", id), Some(&staff), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
