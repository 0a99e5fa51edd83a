mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use tokio::sync::mpsc;

use plantops_api::{
    events::{Event, EventSender},
    services::stocks::{RecordUsageRequest, StockService},
};

use common::{assert_status, TestApp};

async fn seed_stock(app: &TestApp, name: &str, quantity: i32, critical: i32) -> i64 {
    let response = app
        .request_as_admin(
            Method::POST,
            "/api/stocks",
            Some(json!({
                "name": name,
                "quantity": quantity,
                "unit": "pcs",
                "critical_level": critical
            })),
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
async fn stock_crud() {
    let app = TestApp::new().await;

    let stock_id = seed_stock(&app, "Bearing 6204", 20, 5).await;

    let response = app
        .request_as_admin(
            Method::PUT,
            &format!("/api/stocks/{}", stock_id),
            Some(json!({"description": "Deep groove ball bearing", "critical_level": 8})),
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["critical_level"], 8);
    assert_eq!(body["data"]["quantity"], 20);

    // Negative quantity is rejected outright
    let response = app
        .request_as_admin(
            Method::PUT,
            &format!("/api/stocks/{}", stock_id),
            Some(json!({"quantity": -1})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.request_as_user(Method::GET, "/api/stocks", None).await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .request_as_admin(Method::DELETE, &format!("/api/stocks/{}", stock_id), None)
        .await;
    assert_status(response, StatusCode::OK).await;

    let response = app
        .request_as_user(Method::GET, &format!("/api/stocks/{}", stock_id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn usage_decrements_stock() {
    let app = TestApp::new().await;
    let stock_id = seed_stock(&app, "V-belt SPA 1250", 10, 2).await;

    let response = app
        .request_as_user(
            Method::POST,
            "/api/stock-usages",
            Some(json!({
                "stock_id": stock_id,
                "amount": 3,
                "note": "Replaced on crusher drive"
            })),
        )
        .await;
    let body = assert_status(response, StatusCode::CREATED).await;
    assert_eq!(body["data"]["amount"], 3);
    assert_eq!(body["data"]["user"]["email"], "tech@plantops.test");
    assert_eq!(body["data"]["stock"]["name"], "V-belt SPA 1250");

    assert_eq!(stock_quantity(&app, stock_id).await, 7);
}

#[tokio::test]
async fn usage_never_drives_quantity_negative() {
    let app = TestApp::new().await;
    let stock_id = seed_stock(&app, "Contactor 32A", 4, 1).await;

    let response = app
        .request_as_user(
            Method::POST,
            "/api/stock-usages",
            Some(json!({"stock_id": stock_id, "amount": 5})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Nothing changed, no ledger row appeared
    assert_eq!(stock_quantity(&app, stock_id).await, 4);
    let response = app
        .request_as_user(
            Method::GET,
            &format!("/api/stock-usages?stock_id={}", stock_id),
            None,
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    // Zero and negative amounts are rejected up front
    for amount in [0, -2] {
        let response = app
            .request_as_user(
                Method::POST,
                "/api/stock-usages",
                Some(json!({"stock_id": stock_id, "amount": amount})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn usage_of_missing_stock_is_404() {
    let app = TestApp::new().await;

    let response = app
        .request_as_user(
            Method::POST,
            "/api/stock-usages",
            Some(json!({"stock_id": 12345, "amount": 1})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_usage_restores_stock() {
    let app = TestApp::new().await;
    let stock_id = seed_stock(&app, "Fuse 63A", 12, 3).await;

    let response = app
        .request_as_user(
            Method::POST,
            "/api/stock-usages",
            Some(json!({"stock_id": stock_id, "amount": 4})),
        )
        .await;
    let body = assert_status(response, StatusCode::CREATED).await;
    let usage_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(stock_quantity(&app, stock_id).await, 8);

    let response = app
        .request_as_user(
            Method::DELETE,
            &format!("/api/stock-usages/{}", usage_id),
            None,
        )
        .await;
    assert_status(response, StatusCode::OK).await;

    assert_eq!(stock_quantity(&app, stock_id).await, 12);

    let response = app
        .request_as_user(
            Method::GET,
            &format!("/api/stock-usages/{}", usage_id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn crossing_critical_level_emits_exactly_one_alert_event() {
    let app = TestApp::new().await;
    let stock_id = seed_stock(&app, "Relay 24V", 10, 8).await;

    // Service wired to our own channel so the emitted events are observable
    let (tx, mut rx) = mpsc::channel(16);
    let service = StockService::new(app.state.db.clone(), Some(EventSender::new(tx)));

    let usage = |amount: i32| RecordUsageRequest {
        stock_id: stock_id as i32,
        amount,
        used_at: None,
        general_fault_id: None,
        fault_record_id: None,
        note: Some("scheduled replacement".into()),
    };

    // 10 -> 9: still at or above critical, only the usage event
    service
        .record_usage(app.user_id, Some("tech@plantops.test".into()), usage(1))
        .await
        .expect("first usage");
    assert!(matches!(
        rx.recv().await,
        Some(Event::StockUsageRecorded { .. })
    ));

    // 9 -> 7: below critical, usage event then the alert
    service
        .record_usage(app.user_id, Some("tech@plantops.test".into()), usage(2))
        .await
        .expect("second usage");
    assert!(matches!(
        rx.recv().await,
        Some(Event::StockUsageRecorded { .. })
    ));
    match rx.recv().await {
        Some(Event::StockBelowCritical {
            stock_name,
            remaining,
            critical_level,
            used_by,
            ..
        }) => {
            assert_eq!(stock_name, "Relay 24V");
            assert_eq!(remaining, 7);
            assert_eq!(critical_level, 8);
            assert_eq!(used_by.as_deref(), Some("tech@plantops.test"));
        }
        other => panic!("expected StockBelowCritical, got {:?}", other),
    }
}

#[tokio::test]
async fn usage_listing_filters_by_stock_and_user() {
    let app = TestApp::new().await;
    let first = seed_stock(&app, "Grease cartridge", 30, 5).await;
    let second = seed_stock(&app, "Proximity sensor", 9, 2).await;

    for (stock, amount) in [(first, 2), (first, 1), (second, 3)] {
        let response = app
            .request_as_user(
                Method::POST,
                "/api/stock-usages",
                Some(json!({"stock_id": stock, "amount": amount})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .request_as_user(
            Method::GET,
            &format!("/api/stock-usages?stock_id={}", first),
            None,
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let response = app
        .request_as_user(
            Method::GET,
            &format!("/api/stock-usages?user_id={}", app.user_id),
            None,
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let response = app
        .request_as_user(
            Method::GET,
            &format!("/api/stock-usages?user_id={}", app.admin_id),
            None,
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}
