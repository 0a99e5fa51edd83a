use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    middleware,
    routing::get,
    Router,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use plantops_api::{
    auth::{AuthConfig, AuthService, ROLE_ADMIN, ROLE_USER},
    config::AppConfig,
    db, events,
    handlers::AppServices,
    services::users::CreateUserRequest,
    AppState,
};

const TEST_JWT_SECRET: &str =
    "k9PzQ2vT8mW4nR6xJ1cF5bY7dH3gL0sA_k9PzQ2vT8mW4nR6xJ1cF5bY7dH3gL0sA";

/// Helper harness for spinning up an application backed by a throwaway
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    admin_token: String,
    user_token: String,
    pub admin_id: i32,
    pub user_id: i32,
    _event_task: tokio::task::JoinHandle<()>,
    _tmp: tempfile::TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir for test database");
        let db_path = tmp.path().join("plantops_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            TEST_JWT_SECRET.to_string(),
            3600,
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = events::EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx, None));

        let auth_cfg = AuthConfig::new(
            cfg.jwt_secret.clone(),
            cfg.auth_issuer.clone(),
            cfg.auth_audience.clone(),
            Duration::from_secs(cfg.jwt_expiration as u64),
        );
        let auth_service = Arc::new(AuthService::new(auth_cfg, db_arc.clone()));

        let services = AppServices::new(
            db_arc.clone(),
            event_sender.clone(),
            auth_service.clone(),
            &cfg,
        );

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services: services.clone(),
        };

        // Seed one admin and one regular user and mint their tokens
        let admin = services
            .users
            .create(CreateUserRequest {
                email: "admin@plantops.test".into(),
                password: "admin-password".into(),
                role: Some(ROLE_ADMIN.into()),
                first_name: Some("Ada".into()),
                last_name: Some("Admin".into()),
                phone: None,
                department: Some("Maintenance".into()),
            })
            .await
            .expect("seed admin user");

        let user = services
            .users
            .create(CreateUserRequest {
                email: "tech@plantops.test".into(),
                password: "tech-password".into(),
                role: Some(ROLE_USER.into()),
                first_name: Some("Tess".into()),
                last_name: Some("Tech".into()),
                phone: None,
                department: Some("Electrical".into()),
            })
            .await
            .expect("seed regular user");

        let admin_model = auth_service
            .find_user_by_email("admin@plantops.test")
            .await
            .expect("lookup admin")
            .expect("admin exists");
        let user_model = auth_service
            .find_user_by_email("tech@plantops.test")
            .await
            .expect("lookup user")
            .expect("user exists");

        let admin_token = auth_service
            .generate_token(&admin_model)
            .expect("mint admin token");
        let user_token = auth_service
            .generate_token(&user_model)
            .expect("mint user token");

        let router = Router::new()
            .route("/health", get(plantops_api::health_check))
            .nest("/api", plantops_api::api_routes())
            .layer(middleware::from_fn_with_state(
                auth_service,
                |axum::extract::State(auth): axum::extract::State<Arc<AuthService>>,
                 mut req: Request<Body>,
                 next: middleware::Next| async move {
                    req.extensions_mut().insert(auth);
                    next.run(req).await
                },
            ))
            .with_state(state.clone());

        Self {
            router,
            state,
            admin_token,
            user_token,
            admin_id: admin.id,
            user_id: user.id,
            _event_task: event_task,
            _tmp: tmp,
        }
    }

    /// Bearer token for the seeded admin.
    #[allow(dead_code)]
    pub fn admin_token(&self) -> &str {
        &self.admin_token
    }

    /// Bearer token for the seeded non-admin user.
    #[allow(dead_code)]
    pub fn user_token(&self) -> &str {
        &self.user_token
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Convenience helper for admin-authenticated JSON requests.
    pub async fn request_as_admin(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request(method, uri, body, Some(&self.admin_token))
            .await
    }

    /// Convenience helper for non-admin-authenticated JSON requests.
    pub async fn request_as_user(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request(method, uri, body, Some(&self.user_token))
            .await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// Parse a response body as JSON.
#[allow(dead_code)]
pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

/// Assert a status code, printing the body on mismatch.
pub async fn assert_status(response: axum::response::Response, expected: StatusCode) -> Value {
    let status = response.status();
    let body = response_json(response).await;
    assert_eq!(status, expected, "unexpected status, body: {}", body);
    body
}
