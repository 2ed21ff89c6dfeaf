#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, StatusCode, header::{AUTHORIZATION, CONTENT_TYPE}},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use overlay_hub_back::{
    build_router,
    config::{AppConfig, StoreBackend},
    dao::{faceit::FaceitClient, record_store::memory::MemoryRecordStore},
    state::{AppState, SharedState},
};

pub const BRIDGE_SECRET: &str = "test-bridge-secret";
pub const PUBLIC_BASE_URL: &str = "https://hub.test";

/// Configuration with an in-memory store, a bridge secret and no FACEIT key.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.public_base_url = PUBLIC_BASE_URL.into();
    config.storage.backend = StoreBackend::Memory;
    config.auth.secret = Some(BRIDGE_SECRET.into());
    config
}

/// Shared state with the memory store already installed.
pub async fn test_state(config: AppConfig) -> SharedState {
    let faceit = FaceitClient::new(config.faceit_client_config()).expect("faceit client");
    let state = AppState::new(config, faceit);
    state
        .install_record_store(Arc::new(MemoryRecordStore::new()))
        .await;
    state
}

/// Full router, mirroring `main.rs`, over a fresh in-memory store.
pub async fn build_test_app() -> Router {
    build_router(test_state(test_config()).await)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    app.clone().oneshot(request).await.expect("response")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

/// Issue a session through the bridge endpoint and return `(token, user json)`.
pub async fn sign_in(app: &Router, email: &str) -> (String, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/sessions")
        .header("x-auth-secret", BRIDGE_SECRET)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"email": email, "name": "Tester"}).to_string()))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let token = json["token"].as_str().expect("token").to_owned();
    (token, json["user"].clone())
}
