mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{assert_status, response_json, TestApp};

#[tokio::test]
async fn register_login_and_change_password_flow() {
    let app = TestApp::new().await;

    // Register
    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "email": "new.tech@plantops.test",
                "password": "first-password"
            })),
            None,
        )
        .await;
    let body = assert_status(response, StatusCode::CREATED).await;
    assert_eq!(body["email"], "new.tech@plantops.test");
    assert_eq!(body["role"], "user");

    // Login with the new account
    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            Some(json!({
                "email": "new.tech@plantops.test",
                "password": "first-password"
            })),
            None,
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    let token = body["token"].as_str().expect("token issued").to_string();
    assert_eq!(body["user"]["email"], "new.tech@plantops.test");

    // Change password with the issued token
    let response = app
        .request(
            Method::POST,
            "/api/auth/change-password",
            Some(json!({
                "old_password": "first-password",
                "new_password": "second-password"
            })),
            Some(&token),
        )
        .await;
    assert_status(response, StatusCode::OK).await;

    // Old password no longer works, new one does
    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            Some(json!({
                "email": "new.tech@plantops.test",
                "password": "first-password"
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            Some(json!({
                "email": "new.tech@plantops.test",
                "password": "second-password"
            })),
            None,
        )
        .await;
    assert_status(response, StatusCode::OK).await;
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = TestApp::new().await;

    let payload = json!({
        "email": "dup@plantops.test",
        "password": "some-password"
    });

    let response = app
        .request(Method::POST, "/api/auth/register", Some(payload.clone()), None)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request(Method::POST, "/api/auth/register", Some(payload), None)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_failure_is_indistinct() {
    let app = TestApp::new().await;

    // Unknown email and wrong password produce the same status
    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            Some(json!({"email": "nobody@plantops.test", "password": "x"})),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            Some(json!({"email": "admin@plantops.test", "password": "wrong"})),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn auth_actions_append_to_action_log() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "email": "audited@plantops.test",
                "password": "audit-password"
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            Some(json!({
                "email": "audited@plantops.test",
                "password": "audit-password"
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request_as_admin(Method::GET, "/api/action-logs", None)
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    let logs = body["data"].as_array().expect("log array");

    let actions: Vec<&str> = logs
        .iter()
        .filter(|l| l["user"]["email"] == "audited@plantops.test")
        .filter_map(|l| l["action"].as_str())
        .collect();
    assert!(actions.contains(&"register"));
    assert!(actions.contains(&"login"));
}

#[tokio::test]
async fn protected_routes_require_token() {
    let app = TestApp::new().await;

    for uri in [
        "/api/motors",
        "/api/records/my",
        "/api/stocks",
        "/api/action-logs",
        "/api/analytics/dashboard",
    ] {
        let response = app.request(Method::GET, uri, None, None).await;
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "expected 401 for {}",
            uri
        );
    }

    // Garbage token is also rejected
    let response = app
        .request(Method::GET, "/api/motors", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_plain_users() {
    let app = TestApp::new().await;

    let response = app
        .request_as_user(
            Method::POST,
            "/api/motors",
            Some(json!({"serial": "M-100", "name": "Crusher drive"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.request_as_user(Method::GET, "/api/users", None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn profile_roundtrip() {
    let app = TestApp::new().await;

    let response = app.request_as_user(Method::GET, "/api/users/me", None).await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["email"], "tech@plantops.test");
    // Password hash must never leak
    assert!(body["data"].get("password_hash").is_none());

    let response = app
        .request_as_user(
            Method::PUT,
            "/api/users/me",
            Some(json!({"phone": "+90 555 000 1122", "department": "Mechanical"})),
        )
        .await;
    let body = assert_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["phone"], "+90 555 000 1122");
    assert_eq!(body["data"]["department"], "Mechanical");

    let response = response_json(app.request_as_user(Method::GET, "/api/users/me", None).await).await;
    assert_eq!(response["data"]["department"], "Mechanical");
}
