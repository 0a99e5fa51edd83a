mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{assert_status, TestApp};

async fn seed_line(app: &TestApp, code: &str) -> i64 {
    let response = app
        .request_as_admin(
            Method::POST,
            "/api/production-lines",
            Some(json!({"code": code, "name": format!("Line {}", code)})),
        )
        .await;
    let body = assert_status(response, StatusCode::CREATED).await;
    body["data"]["id"].as_i64().expect("line id")
}

async fn seed_stock(app: &TestApp, name: &str, quantity: i32) -> i64 {
    let response = app
        .request_as_admin(
            Method::POST,
            "/api/stocks",
            Some(json!({"name": name, "quantity": quantity, "critical_level": 2})),
        )
        .await;
    let body = assert_status(response, StatusCode::CREATED).await;
    body["data"]["id"].as_i64().expect("stock id")
}

async fn stock_quantity(app: &TestApp, stock_id: i64) -> i64 {
    let response = app
        .request_as_user(Method::GET, &format!("/api/stocks/{}", stock_id), None)
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    body["data"]["quantity"].as_i64().expect("quantity")
}

#[tokio::test]
async fn create_with_lines_files_and_deductions() {
    let app = TestApp::new().await;
    let line_a = seed_line(&app, "A1").await;
    let line_b = seed_line(&app, "A2").await;
    let stock_id = seed_stock(&app, "Coupling insert", 10).await;

    let response = app
        .request_as_user(
            Method::POST,
            "/api/general-faults",
            Some(json!({
                "description": "Main conveyor gearbox seized",
                "location": "Hall A",
                "production_impact": true,
                "lines": [
                    {"line_id": line_a, "downtime_min": 25},
                    {"line_id": line_b, "downtime_min": 5}
                ],
                "files": [
                    {"url": "https://files.plantops.test/gearbox.jpg", "file_name": "gearbox.jpg"}
                ],
                "stock_usages": [
                    {"stock_id": stock_id, "amount": 2, "note": "Replaced coupling inserts"}
                ]
            })),
        )
        .await;
    let body = assert_status(response, StatusCode::CREATED).await;
    let fault_id = body["data"]["id"].as_i64().expect("fault id");

    assert_eq!(body["data"]["reporter"]["email"], "tech@plantops.test");
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["files"][0]["file_name"], "gearbox.jpg");

    // The deduction committed with the fault
    assert_eq!(stock_quantity(&app, stock_id).await, 8);

    // The usage row points back at the fault
    let response = app
        .request_as_user(
            Method::GET,
            &format!("/api/stock-usages?stock_id={}", stock_id),
            None,
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"][0]["general_fault_id"], fault_id);
}

#[tokio::test]
async fn insufficient_stock_rolls_back_everything() {
    let app = TestApp::new().await;
    let line_id = seed_line(&app, "B1").await;
    let plenty = seed_stock(&app, "Hose clamp", 50).await;
    let scarce = seed_stock(&app, "Pressure valve", 1).await;

    let response = app
        .request_as_user(
            Method::POST,
            "/api/general-faults",
            Some(json!({
                "description": "Hydraulic leak on press",
                "production_impact": true,
                "lines": [{"line_id": line_id, "downtime_min": 40}],
                "stock_usages": [
                    {"stock_id": plenty, "amount": 4},
                    {"stock_id": scarce, "amount": 3}
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Nothing persisted: no fault, no deductions (including the one that
    // would have succeeded on its own)
    let response = app
        .request_as_user(Method::GET, "/api/general-faults", None)
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    assert_eq!(stock_quantity(&app, plenty).await, 50);
    assert_eq!(stock_quantity(&app, scarce).await, 1);

    let response = app
        .request_as_user(Method::GET, "/api/stock-usages", None)
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_line_is_rejected_up_front() {
    let app = TestApp::new().await;

    let response = app
        .request_as_user(
            Method::POST,
            "/api/general-faults",
            Some(json!({
                "description": "Ghost fault",
                "lines": [{"line_id": 404, "downtime_min": 10}]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_filters() {
    let app = TestApp::new().await;
    let line_a = seed_line(&app, "C1").await;
    let line_b = seed_line(&app, "C2").await;

    let mk = |description: &str, impact: bool, line: i64, occurred_at: &str| {
        json!({
            "description": description,
            "production_impact": impact,
            "occurred_at": occurred_at,
            "lines": [{"line_id": line, "downtime_min": 5}]
        })
    };

    for payload in [
        mk("Filter blocked", false, line_a, "2024-02-01T10:00:00Z"),
        mk("Motor overheated", true, line_a, "2024-02-15T10:00:00Z"),
        mk("Sensor drift", true, line_b, "2024-03-10T10:00:00Z"),
    ] {
        let response = app
            .request_as_user(Method::POST, "/api/general-faults", Some(payload))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // By production impact
    let response = app
        .request_as_user(Method::GET, "/api/general-faults?production_impact=true", None)
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // By line
    let response = app
        .request_as_user(
            Method::GET,
            &format!("/api/general-faults?line={}", line_b),
            None,
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["description"], "Sensor drift");

    // By date range
    let response = app
        .request_as_user(
            Method::GET,
            "/api/general-faults?start=2024-02-10T00:00:00Z&end=2024-02-28T00:00:00Z",
            None,
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["description"], "Motor overheated");
}

#[tokio::test]
async fn delete_cascades_dependents() {
    let app = TestApp::new().await;
    let line_id = seed_line(&app, "D1").await;
    let stock_id = seed_stock(&app, "Seal kit", 6).await;

    let response = app
        .request_as_user(
            Method::POST,
            "/api/general-faults",
            Some(json!({
                "description": "Pump seal failure",
                "lines": [{"line_id": line_id, "downtime_min": 20}],
                "files": [{"url": "https://files.plantops.test/seal.jpg", "file_name": "seal.jpg"}],
                "stock_usages": [{"stock_id": stock_id, "amount": 1}]
            })),
        )
        .await;
    let body = assert_status(response, StatusCode::CREATED).await;
    let fault_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .request_as_user(
            Method::DELETE,
            &format!("/api/general-faults/{}", fault_id),
            None,
        )
        .await;
    assert_status(response, StatusCode::OK).await;

    let response = app
        .request_as_user(
            Method::GET,
            &format!("/api/general-faults/{}", fault_id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Ledger rows for the fault are gone; consumed stock stays consumed
    let response = app
        .request_as_user(Method::GET, "/api/stock-usages", None)
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(stock_quantity(&app, stock_id).await, 5);
}
