mod common;

use axum::http::{header, StatusCode};
use common::{body_text, parse_body, TestApp};
use serde_json::{json, Value};

async fn record_inflow(app: &TestApp, token: &str, amount: f64, currency: &str, category: &str) -> Value {
    let res = app.request("POST", "/api/inflows", Some(token), Some(json!({
        "category": category,
        "description": "Visit",
        "amount": amount,
        "currency": currency,
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await
}

async fn record_outflow(app: &TestApp, token: &str, amount: f64, category: &str) -> Value {
    let res = app.request("POST", "/api/outflows", Some(token), Some(json!({
        "category": category,
        "description": "Supplies",
        "amount": amount,
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await
}

async fn backdate(app: &TestApp, table: &str, id_column: &str, id: &Value, recorded_at: &str) {
    let sql = format!("UPDATE {} SET recorded_at = ? WHERE {} = ?", table, id_column);
    sqlx::query(&sql)
        .bind(recorded_at)
        .bind(id.as_str().unwrap())
        .execute(&app.pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_dashboard_converts_mixed_currencies() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    record_inflow(&app, &admin, 1000.0, "MKD", "consultation").await;
    record_inflow(&app, &admin, 10.0, "EUR", "consultation").await;
    record_outflow(&app, &admin, 115.0, "supplies").await;
    app.create_patient(&admin, "Petar", None).await;

    let res = app.request("GET", "/api/dashboard/stats", Some(&admin), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let stats = parse_body(res).await;

    assert_eq!(stats["total_inflows_mkd"], 1615.0);
    assert_eq!(stats["total_inflows_eur"], 26.26);
    assert_eq!(stats["total_outflows_mkd"], 115.0);
    assert_eq!(stats["balance_mkd"], 1500.0);
    assert_eq!(stats["today_inflows_mkd"], 1615.0);
    assert_eq!(stats["month_inflows_mkd"], 1615.0);
    assert_eq!(stats["exchange_rate"], 61.5);
    assert_eq!(stats["patients_count"], 1);
    assert_eq!(stats["invoices_pending"], 0);
}

#[tokio::test]
async fn test_monthly_report_buckets_by_day_and_category() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    let inflow = record_inflow(&app, &admin, 500.0, "MKD", "consultation").await;
    let outflow = record_outflow(&app, &admin, 200.0, "supplies").await;
    let other_month = record_inflow(&app, &admin, 999.0, "MKD", "surgery").await;
    backdate(&app, "inflows", "inflow_id", &inflow["inflow_id"], "2024-03-05T10:00:00Z").await;
    backdate(&app, "outflows", "outflow_id", &outflow["outflow_id"], "2024-03-05 16:30:00").await;
    backdate(&app, "inflows", "inflow_id", &other_month["inflow_id"], "2024-04-01T00:00:00Z").await;

    let res = app.request("GET", "/api/reports/monthly?year=2024&month=3", Some(&admin), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let report = parse_body(res).await;

    assert_eq!(report["total_inflows_mkd"], 500.0);
    assert_eq!(report["total_outflows_mkd"], 200.0);
    assert_eq!(report["balance_mkd"], 300.0);
    assert_eq!(report["inflows_by_category"]["consultation"], 500.0);
    assert_eq!(report["outflows_by_category"]["supplies"], 200.0);

    let daily = report["daily_data"].as_array().unwrap();
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0], json!({ "date": "2024-03-05", "inflows": 500.0, "outflows": 200.0 }));

    let res = app.request("GET", "/api/reports/monthly?year=2024&month=13", Some(&admin), None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ledger_listing_filters_by_day_and_currency() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    let march = record_inflow(&app, &admin, 100.0, "MKD", "consultation").await;
    let march_end = record_inflow(&app, &admin, 20.0, "EUR", "consultation").await;
    let april = record_inflow(&app, &admin, 300.0, "MKD", "consultation").await;
    backdate(&app, "inflows", "inflow_id", &march["inflow_id"], "2024-03-01T00:00:00Z").await;
    backdate(&app, "inflows", "inflow_id", &march_end["inflow_id"], "2024-03-31T23:59:59Z").await;
    backdate(&app, "inflows", "inflow_id", &april["inflow_id"], "2024-04-01T00:00:00Z").await;

    let res = app.request("GET", "/api/inflows?start_date=2024-03-01&end_date=2024-03-31", Some(&admin), None).await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 2);

    let res = app.request("GET", "/api/inflows?start_date=2024-03-01&end_date=2024-03-31&currency=EUR", Some(&admin), None).await;
    let eur = parse_body(res).await;
    assert_eq!(eur.as_array().unwrap().len(), 1);
    assert_eq!(eur[0]["amount"], 20.0);

    let res = app.request("GET", "/api/inflows?start_date=March", Some(&admin), None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inflow_settles_linked_invoice() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let patient = app.create_patient(&admin, "Vesna", None).await;

    let invoice = parse_body(app.request("POST", "/api/invoices", Some(&admin), Some(json!({
        "patient_id": patient["patient_id"],
        "total_amount": 1180,
        "status": "pending",
    }))).await).await;

    let stats = parse_body(app.request("GET", "/api/dashboard/stats", Some(&admin), None).await).await;
    assert_eq!(stats["invoices_pending"], 1);

    let res = app.request("POST", "/api/inflows", Some(&admin), Some(json!({
        "category": "invoice",
        "description": "Payment",
        "amount": 1180,
        "payment_method": "card",
        "patient_id": patient["patient_id"],
        "invoice_id": invoice["invoice_id"],
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.request("GET", &format!("/api/invoices/{}", invoice["invoice_id"].as_str().unwrap()), Some(&admin), None).await;
    assert_eq!(parse_body(res).await["status"], "paid");

    // A dangling invoice reference does not fail the inflow
    let res = app.request("POST", "/api/inflows", Some(&admin), Some(json!({
        "category": "invoice",
        "description": "Payment",
        "amount": 10,
        "invoice_id": "inv_missing",
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_ledger_entry_update_and_delete() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    let res = app.request("POST", "/api/outflows", Some(&admin), Some(json!({
        "category": "rent", "description": "Rent", "amount": -1,
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let outflow = record_outflow(&app, &admin, 200.0, "supplies").await;
    let id = outflow["outflow_id"].as_str().unwrap();

    let res = app.request("PUT", &format!("/api/outflows/{}", id), Some(&admin), Some(json!({
        "category": "rent", "description": "Rent", "amount": 12000, "currency": "MKD",
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = parse_body(res).await;
    assert_eq!(updated["category"], "rent");
    assert_eq!(updated["recorded_at"], outflow["recorded_at"]);

    assert_eq!(app.request("DELETE", &format!("/api/outflows/{}", id), Some(&admin), None).await.status(), StatusCode::OK);
    assert_eq!(app.request("DELETE", &format!("/api/outflows/{}", id), Some(&admin), None).await.status(), StatusCode::NOT_FOUND);

    let res = app.request("PUT", "/api/inflows/in_missing", Some(&admin), Some(json!({
        "category": "x", "description": "x", "amount": 1,
    }))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_exchange_rate_history() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    let res = app.request("GET", "/api/exchange-rate", Some(&admin), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["eur_to_mkd"], 61.5);

    let res = app.request("PUT", "/api/exchange-rate", Some(&admin), Some(json!({ "eur_to_mkd": 0 }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.request("PUT", "/api/exchange-rate", Some(&admin), Some(json!({ "eur_to_mkd": 61.7 }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let current = parse_body(app.request("GET", "/api/exchange-rate", Some(&admin), None).await).await;
    assert_eq!(current["eur_to_mkd"], 61.7);
    assert!(current["updated_by"].is_string());

    let (history,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM exchange_rates")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(history, 2);
}

#[tokio::test]
async fn test_csv_export_carries_currency_totals() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    record_inflow(&app, &admin, 1000.0, "MKD", "consultation, follow-up").await;
    record_inflow(&app, &admin, 10.0, "EUR", "consultation").await;

    let res = app.request("GET", "/api/export/csv?type=inflows", Some(&admin), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
    assert_eq!(res.headers()[header::CONTENT_DISPOSITION], "attachment; filename=inflows_export.csv");

    let csv = body_text(res).await;
    let lines: Vec<&str> = csv.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(lines[0], "id,category,description,amount,currency,payment_method,date");
    assert_eq!(lines.len(), 5);
    assert!(csv.contains("\"consultation, follow-up\""));
    assert!(lines.contains(&"TOTAL EUR,10"));
    assert!(lines.contains(&"TOTAL MKD,1000"));
}

#[tokio::test]
async fn test_json_export_and_bad_requests() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    app.create_patient(&admin, "Ema", Some("ema@mail.test")).await;

    let res = app.request("GET", "/api/export/json?type=patients", Some(&admin), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_DISPOSITION], "attachment; filename=patients_export.json");
    let body = parse_body(res).await;
    assert_eq!(body["rows"][0]["first_name"], "Ema");
    assert_eq!(body["rows"][0]["email"], "ema@mail.test");
    assert!(body.get("totals").is_none());

    assert_eq!(app.request("GET", "/api/export/xlsx?type=patients", Some(&admin), None).await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.request("GET", "/api/export/csv?type=users", Some(&admin), None).await.status(), StatusCode::BAD_REQUEST);
}
