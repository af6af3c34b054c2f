//! Authentication test helpers

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use ecomz_auth::backend::routes::create_router;
use ecomz_auth::backend::server::state::AppState;
use ecomz_auth::shared::{AppConfig, JwtSecret};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_ISSUER: &str = "ecomz-auth-test";

/// Configuration with the cheapest accepted bcrypt cost
pub fn test_config() -> AppConfig {
    AppConfig::builder()
        .app_name(TEST_ISSUER)
        .jwt_secret(TEST_SECRET)
        .password_cost(4)
        .build()
        .expect("valid test config")
}

pub fn test_secret() -> JwtSecret {
    JwtSecret::new(TEST_SECRET)
}

/// Router over fresh in-memory stores seeded with the default roles
pub fn test_app() -> Router {
    create_router(AppState::in_memory(&test_config()))
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Send a request and return the status and body (JSON if it parses,
/// otherwise the raw text as a JSON string)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, auth_header(token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub fn register_body(name: &str, email: &str, password: &str, role_id: i32) -> Value {
    serde_json::json!({
        "name": name,
        "email": email,
        "password": password,
        "role_id": role_id,
    })
}

/// Register a customer and return the response body
pub async fn register_user(app: &Router, name: &str, email: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(register_body(name, email, password, 2)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {}", body);
    body
}

pub fn access_token(body: &Value) -> String {
    body["access_token"].as_str().expect("access_token").to_string()
}

pub fn refresh_token(body: &Value) -> String {
    body["refresh_token"].as_str().expect("refresh_token").to_string()
}
