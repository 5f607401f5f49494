#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::TimeZone;
use http_body_util::BodyExt;
use tower::ServiceExt;

use editlock_api::config::ServerConfig;
use editlock_api::router::build_app_router;
use editlock_api::state::AppState;
use editlock_coordinator::{
    LockCoordinator, LockDescriptorRegistry, ManualContext, StaticDescriptorProvider,
};
use editlock_core::locking::{LockDescriptor, LockOwner};
use editlock_core::types::Timestamp;
use editlock_events::{NodeId, NoopTransport};

/// Build a test `ServerConfig` with safe defaults.
///
/// Declares two lock types: `invoice` expiring after 60 seconds and
/// `customer` that never expires.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        node_id: NodeId::random(),
        descriptors_path: None,
        lock_types: vec![
            LockDescriptor::new("invoice", Some(60)),
            LockDescriptor::new("customer", None),
        ],
        sweep_interval_secs: 60,
        peer_urls: Vec::new(),
    }
}

/// A fixed starting instant for the test clock.
pub fn start() -> Timestamp {
    chrono::Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

/// A running test application together with its controllable clock and
/// the coordinator behind it.
pub struct TestApp {
    pub router: Router,
    pub clock: Arc<ManualContext>,
    pub coordinator: Arc<LockCoordinator>,
}

/// Build the full application router with all middleware layers over a
/// coordinator driven by a [`ManualContext`].
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let clock = Arc::new(ManualContext::new(start(), LockOwner::new("system", "System")));
    let coordinator = Arc::new(LockCoordinator::new(
        LockDescriptorRegistry::with_provider(StaticDescriptorProvider::new(
            config.lock_types.clone(),
        )),
        clock.clone(),
        Arc::new(NoopTransport),
    ));

    let state = AppState {
        coordinator: Arc::clone(&coordinator),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        clock,
        coordinator,
    }
}

/// Send a GET request.
pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Send a POST with a JSON body on behalf of `user` (id, display name).
pub async fn post_json_as(
    app: &Router,
    uri: &str,
    user: Option<(&str, &str)>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some((id, name)) = user {
        builder = builder.header("x-user-id", id).header("x-user-name", name);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Send a request with a raw byte body.
pub async fn send_bytes(app: &Router, method: Method, uri: &str, body: Vec<u8>) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Collect a response body into raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// POST /api/v1/locks/acquire as `user`.
pub async fn acquire(
    app: &Router,
    user: (&str, &str),
    resource_type: &str,
    resource_id: &str,
) -> Response<Body> {
    post_json_as(
        app,
        "/api/v1/locks/acquire",
        Some(user),
        serde_json::json!({ "resource_type": resource_type, "resource_id": resource_id }),
    )
    .await
}

/// POST /api/v1/locks/release as `user`.
pub async fn release(
    app: &Router,
    user: (&str, &str),
    resource_type: &str,
    resource_id: &str,
) -> Response<Body> {
    post_json_as(
        app,
        "/api/v1/locks/release",
        Some(user),
        serde_json::json!({ "resource_type": resource_type, "resource_id": resource_id }),
    )
    .await
}

pub const ALICE: (&str, &str) = ("u-1", "Alice");
pub const BOB: (&str, &str) = ("u-2", "Bob");
