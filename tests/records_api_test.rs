mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use tokio::sync::mpsc;

use plantops_api::{
    events::{Event, EventSender},
    services::records::{CreateRecordRequest, RecordService},
};

use common::{assert_status, TestApp};

async fn seed_motor(app: &TestApp, serial: &str) -> i64 {
    let response = app
        .request_as_admin(
            Method::POST,
            "/api/motors",
            Some(json!({"serial": serial, "name": format!("Motor {}", serial)})),
        )
        .await;
    let body = assert_status(response, StatusCode::CREATED).await;
    body["data"]["id"].as_i64().expect("motor id")
}

async fn seed_fault_type(app: &TestApp, name: &str) -> i64 {
    let response = app
        .request_as_admin(Method::POST, "/api/fault-types", Some(json!({"name": name})))
        .await;
    let body = assert_status(response, StatusCode::CREATED).await;
    body["data"]["id"].as_i64().expect("fault type id")
}

#[tokio::test]
async fn record_lifecycle() {
    let app = TestApp::new().await;
    let motor_id = seed_motor(&app, "M-9").await;
    let type_id = seed_fault_type(&app, "Overcurrent trip").await;

    let response = app
        .request_as_user(
            Method::POST,
            "/api/records",
            Some(json!({
                "motor_id": motor_id,
                "fault_type_id": type_id,
                "description": "Tripped twice during startup",
                "duration_min": 35
            })),
        )
        .await;
    let body = assert_status(response, StatusCode::CREATED).await;
    let record_id = body["data"]["id"].as_i64().expect("record id");
    assert_eq!(body["data"]["motor"]["serial"], "M-9");
    assert_eq!(body["data"]["fault_type"]["name"], "Overcurrent trip");
    assert_eq!(body["data"]["user"]["email"], "tech@plantops.test");

    // Admin update
    let response = app
        .request_as_admin(
            Method::PUT,
            &format!("/api/records/{}", record_id),
            Some(json!({"duration_min": 50})),
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["duration_min"], 50);
    assert_eq!(body["data"]["description"], "Tripped twice during startup");

    // Plain users cannot update or delete
    let response = app
        .request_as_user(
            Method::PUT,
            &format!("/api/records/{}", record_id),
            Some(json!({"duration_min": 1})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .request_as_admin(Method::DELETE, &format!("/api/records/{}", record_id), None)
        .await;
    assert_status(response, StatusCode::OK).await;

    let response = app
        .request_as_admin(Method::DELETE, &format!("/api/records/{}", record_id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unscoped_listing_is_admin_only() {
    let app = TestApp::new().await;
    let motor_id = seed_motor(&app, "M-10").await;
    let type_id = seed_fault_type(&app, "Vibration").await;

    let response = app
        .request_as_user(
            Method::POST,
            "/api/records",
            Some(json!({
                "motor_id": motor_id,
                "fault_type_id": type_id,
                "description": "Excessive vibration on bearing side"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Without a motor filter, plain users get 403
    let response = app.request_as_user(Method::GET, "/api/records", None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // With a motor filter, everyone authenticated can read
    let response = app
        .request_as_user(
            Method::GET,
            &format!("/api/records?motor_id={}", motor_id),
            None,
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Admins can list everything
    let response = app.request_as_admin(Method::GET, "/api/records", None).await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn my_records_are_scoped_to_caller() {
    let app = TestApp::new().await;
    let motor_id = seed_motor(&app, "M-11").await;
    let type_id = seed_fault_type(&app, "Winding fault").await;

    // One record from each seeded account
    for token_is_admin in [false, true] {
        let payload = json!({
            "motor_id": motor_id,
            "fault_type_id": type_id,
            "description": "Insulation resistance low"
        });
        let response = if token_is_admin {
            app.request_as_admin(Method::POST, "/api/records", Some(payload))
                .await
        } else {
            app.request_as_user(Method::POST, "/api/records", Some(payload))
                .await
        };
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .request_as_user(Method::GET, "/api/records/my", None)
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["user"]["email"], "tech@plantops.test");
}

#[tokio::test]
async fn third_recurrence_emits_alert_event_once() {
    let app = TestApp::new().await;
    let motor_id = seed_motor(&app, "M-13").await as i32;
    let type_id = seed_fault_type(&app, "Seal leak").await as i32;

    let (tx, mut rx) = mpsc::channel(32);
    let service = RecordService::new(app.state.db.clone(), Some(EventSender::new(tx)), 3);

    let request = || CreateRecordRequest {
        motor_id,
        fault_type_id: type_id,
        description: "Oil seal leaking again".into(),
        duration_min: Some(15),
        occurred_at: None,
    };

    let mut recurrence_events = 0;
    for _ in 0..4 {
        service
            .create(app.user_id, request())
            .await
            .expect("create record");

        // Drain whatever the creation emitted
        while let Ok(event) = rx.try_recv() {
            if let Event::FaultRecurrence {
                motor_name,
                fault_type,
                occurrences,
                ..
            } = event
            {
                assert_eq!(motor_name, "Motor M-13");
                assert_eq!(fault_type, "Seal leak");
                assert_eq!(occurrences, 3);
                recurrence_events += 1;
            }
        }
    }

    // Fired on the third record and only the third
    assert_eq!(recurrence_events, 1);
}

#[tokio::test]
async fn record_rejects_unknown_references() {
    let app = TestApp::new().await;
    let motor_id = seed_motor(&app, "M-12").await;

    let response = app
        .request_as_user(
            Method::POST,
            "/api/records",
            Some(json!({
                "motor_id": motor_id,
                "fault_type_id": 999,
                "description": "Phantom fault type"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request_as_user(
            Method::POST,
            "/api/records",
            Some(json!({
                "motor_id": 999,
                "fault_type_id": 1,
                "description": "Phantom motor"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
