mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{assert_status, TestApp};

#[tokio::test]
async fn motor_lifecycle() {
    let app = TestApp::new().await;

    // Create
    let response = app
        .request_as_admin(
            Method::POST,
            "/api/motors",
            Some(json!({
                "serial": "M-2204-A",
                "name": "Kiln feed pump",
                "power_kw": 45.0,
                "voltage": 400.0,
                "phase": 3,
                "location": "Hall B",
                "manufacturer": "WEG"
            })),
        )
        .await;
    let body = assert_status(response, StatusCode::CREATED).await;
    let motor_id = body["data"]["id"].as_i64().expect("motor id");
    assert_eq!(body["data"]["serial"], "M-2204-A");
    assert_eq!(body["data"]["is_active"], true);

    // Get
    let response = app
        .request_as_user(Method::GET, &format!("/api/motors/{}", motor_id), None)
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["name"], "Kiln feed pump");

    // Update mutates only the supplied fields
    let response = app
        .request_as_admin(
            Method::PUT,
            &format!("/api/motors/{}", motor_id),
            Some(json!({"status": "maintenance"})),
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["status"], "maintenance");
    assert_eq!(body["data"]["serial"], "M-2204-A");
    assert_eq!(body["data"]["power_kw"], 45.0);

    // List contains it
    let response = app.request_as_user(Method::GET, "/api/motors", None).await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Delete, then 404
    let response = app
        .request_as_admin(Method::DELETE, &format!("/api/motors/{}", motor_id), None)
        .await;
    assert_status(response, StatusCode::OK).await;

    let response = app
        .request_as_user(Method::GET, &format!("/api/motors/{}", motor_id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn motor_requires_serial_and_name() {
    let app = TestApp::new().await;

    let response = app
        .request_as_admin(Method::POST, "/api/motors", Some(json!({"serial": "", "name": ""})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn control_device_lifecycle_embeds_motor() {
    let app = TestApp::new().await;

    let response = app
        .request_as_admin(
            Method::POST,
            "/api/motors",
            Some(json!({"serial": "M-1", "name": "Conveyor drive"})),
        )
        .await;
    let body = assert_status(response, StatusCode::CREATED).await;
    let motor_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .request_as_admin(
            Method::POST,
            "/api/control-devices",
            Some(json!({
                "device_type": "vfd",
                "serial": "VFD-771",
                "brand": "Danfoss",
                "power_kw": 55.0,
                "voltage": 400.0,
                "active_motor_id": motor_id
            })),
        )
        .await;
    let body = assert_status(response, StatusCode::CREATED).await;
    let device_id = body["data"]["id"].as_i64().unwrap();

    // Get embeds the driven motor
    let response = app
        .request_as_user(
            Method::GET,
            &format!("/api/control-devices/{}", device_id),
            None,
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["serial"], "VFD-771");
    assert_eq!(body["data"]["motor"]["serial"], "M-1");

    // A device pointing at a missing motor is a 400
    let response = app
        .request_as_admin(
            Method::POST,
            "/api/control-devices",
            Some(json!({
                "device_type": "soft-starter",
                "serial": "SS-1",
                "power_kw": 22.0,
                "voltage": 400.0,
                "active_motor_id": 9999
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Update and delete
    let response = app
        .request_as_admin(
            Method::PUT,
            &format!("/api/control-devices/{}", device_id),
            Some(json!({"is_spare": true, "status": "shelf"})),
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["is_spare"], true);

    let response = app
        .request_as_admin(
            Method::DELETE,
            &format!("/api/control-devices/{}", device_id),
            None,
        )
        .await;
    assert_status(response, StatusCode::OK).await;
}

#[tokio::test]
async fn fault_type_crud_is_admin_gated() {
    let app = TestApp::new().await;

    let response = app
        .request_as_user(
            Method::POST,
            "/api/fault-types",
            Some(json!({"name": "Bearing failure"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .request_as_admin(
            Method::POST,
            "/api/fault-types",
            Some(json!({"name": "Bearing failure"})),
        )
        .await;
    let body = assert_status(response, StatusCode::CREATED).await;
    let type_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .request_as_admin(
            Method::PUT,
            &format!("/api/fault-types/{}", type_id),
            Some(json!({"name": "Bearing wear"})),
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["name"], "Bearing wear");

    // Everyone with a token can read the catalog
    let response = app
        .request_as_user(Method::GET, "/api/fault-types", None)
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .request_as_admin(
            Method::DELETE,
            &format!("/api/fault-types/{}", type_id),
            None,
        )
        .await;
    assert_status(response, StatusCode::OK).await;
}

#[tokio::test]
async fn production_line_codes_are_unique() {
    let app = TestApp::new().await;

    let response = app
        .request_as_admin(
            Method::POST,
            "/api/production-lines",
            Some(json!({"code": "A1", "name": "Line A1"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request_as_admin(
            Method::POST,
            "/api/production-lines",
            Some(json!({"code": "A1", "name": "Duplicate"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .request_as_user(Method::GET, "/api/production-lines", None)
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn production_stop_lifecycle() {
    let app = TestApp::new().await;

    let response = app
        .request_as_user(
            Method::POST,
            "/api/production-stops",
            Some(json!({
                "line": "A3",
                "started_at": "2024-03-01T08:00:00Z",
                "ended_at": "2024-03-01T08:45:00Z",
                "duration_min": 45,
                "reason": "Conveyor belt jam"
            })),
        )
        .await;
    let body = assert_status(response, StatusCode::CREATED).await;
    let stop_id = body["data"]["id"].as_i64().unwrap();

    // End before start is rejected
    let response = app
        .request_as_user(
            Method::POST,
            "/api/production-stops",
            Some(json!({
                "line": "A3",
                "started_at": "2024-03-01T09:00:00Z",
                "ended_at": "2024-03-01T08:00:00Z",
                "duration_min": 60
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Listing embeds the creating user
    let response = app
        .request_as_user(Method::GET, "/api/production-stops", None)
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    let stops = body["data"].as_array().unwrap();
    assert_eq!(stops.len(), 1);
    assert_eq!(stops[0]["created_by_user"]["email"], "tech@plantops.test");

    let response = app
        .request_as_user(
            Method::PUT,
            &format!("/api/production-stops/{}", stop_id),
            Some(json!({
                "line": "A3",
                "started_at": "2024-03-01T08:00:00Z",
                "ended_at": "2024-03-01T09:00:00Z",
                "duration_min": 60,
                "reason": "Conveyor belt jam, extended"
            })),
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["duration_min"], 60);

    let response = app
        .request_as_user(
            Method::DELETE,
            &format!("/api/production-stops/{}", stop_id),
            None,
        )
        .await;
    assert_status(response, StatusCode::OK).await;
}

#[tokio::test]
async fn announcements_post_and_read() {
    let app = TestApp::new().await;

    // Only admins can post
    let response = app
        .request_as_user(
            Method::POST,
            "/api/announcements",
            Some(json!({"title": "Planned outage", "body": "Saturday 06:00-08:00"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .request_as_admin(
            Method::POST,
            "/api/announcements",
            Some(json!({"title": "Planned outage", "body": "Saturday 06:00-08:00"})),
        )
        .await;
    let body = assert_status(response, StatusCode::CREATED).await;
    let ann_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .request_as_user(Method::GET, "/api/announcements", None)
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"][0]["title"], "Planned outage");

    let response = app
        .request_as_admin(
            Method::DELETE,
            &format!("/api/announcements/{}", ann_id),
            None,
        )
        .await;
    assert_status(response, StatusCode::OK).await;
}
