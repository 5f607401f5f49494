//! Integration tests for the `/locks` and `/admin/locks` endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{acquire, body_json, build_test_app, get, post_json_as, release, ALICE, BOB};

// ---------------------------------------------------------------------------
// Acquire
// ---------------------------------------------------------------------------

#[tokio::test]
async fn acquire_free_resource_succeeds() {
    let app = build_test_app();

    let response = acquire(&app.router, ALICE, "invoice", "42").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "acquired");

    let held = app.coordinator.current_locks();
    assert_eq!(held.len(), 1);
    assert_eq!(held[0].owner_id, "u-1");
    assert_eq!(held[0].owner_name, "Alice");
    assert_eq!(held[0].acquired_at, common::start());
}

#[tokio::test]
async fn acquire_held_resource_returns_409_with_holder() {
    let app = build_test_app();
    acquire(&app.router, ALICE, "invoice", "42").await;

    let response = acquire(&app.router, BOB, "invoice", "42").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("Alice"), "holder missing from {message}");
    assert!(message.contains("invoice/42"));
}

#[tokio::test]
async fn acquire_is_not_reentrant_for_the_holder() {
    let app = build_test_app();
    acquire(&app.router, ALICE, "invoice", "42").await;

    let response = acquire(&app.router, ALICE, "invoice", "42").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn acquire_unconfigured_type_reports_not_supported() {
    let app = build_test_app();

    let response = acquire(&app.router, ALICE, "report", "1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "not_supported");
    assert!(app.coordinator.current_locks().is_empty());
}

#[tokio::test]
async fn acquire_without_user_header_returns_401() {
    let app = build_test_app();

    let response = post_json_as(
        &app.router,
        "/api/v1/locks/acquire",
        None,
        serde_json::json!({ "resource_type": "invoice", "resource_id": "42" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn acquire_with_empty_resource_id_returns_400() {
    let app = build_test_app();

    let response = acquire(&app.router, ALICE, "invoice", "").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn display_name_defaults_to_user_id() {
    let app = build_test_app();

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/v1/locks/acquire")
        .header("content-type", "application/json")
        .header("x-user-id", "u-9")
        .body(axum::body::Body::from(
            r#"{"resource_type":"invoice","resource_id":"7"}"#,
        ))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let held = app.coordinator.current_locks();
    assert_eq!(held[0].owner_name, "u-9");
}

// ---------------------------------------------------------------------------
// Release
// ---------------------------------------------------------------------------

#[tokio::test]
async fn release_frees_the_resource_for_others() {
    let app = build_test_app();
    acquire(&app.router, ALICE, "invoice", "42").await;

    let response = release(&app.router, ALICE, "invoice", "42").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["released"], true);

    let response = acquire(&app.router, BOB, "invoice", "42").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn release_of_free_resource_is_not_an_error() {
    let app = build_test_app();

    let response = release(&app.router, ALICE, "invoice", "42").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["released"], false);
}

#[tokio::test]
async fn release_by_another_user_still_removes_the_lock() {
    let app = build_test_app();
    acquire(&app.router, ALICE, "invoice", "42").await;

    let response = release(&app.router, BOB, "invoice", "42").await;
    assert_eq!(body_json(response).await["data"]["released"], true);
    assert!(app.coordinator.current_locks().is_empty());
}

// ---------------------------------------------------------------------------
// Status and listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_reports_locked_unlocked_and_not_supported() {
    let app = build_test_app();
    acquire(&app.router, ALICE, "invoice", "42").await;

    let json = body_json(get(&app.router, "/api/v1/locks/invoice/42").await).await;
    assert_eq!(json["data"]["state"], "locked");
    assert_eq!(json["data"]["owner_id"], "u-1");
    assert_eq!(json["data"]["owner_name"], "Alice");

    let json = body_json(get(&app.router, "/api/v1/locks/invoice/43").await).await;
    assert_eq!(json["data"]["state"], "unlocked");

    let json = body_json(get(&app.router, "/api/v1/locks/report/1").await).await;
    assert_eq!(json["data"]["state"], "not_supported");
}

#[tokio::test]
async fn list_returns_every_held_lock() {
    let app = build_test_app();
    acquire(&app.router, ALICE, "invoice", "1").await;
    acquire(&app.router, BOB, "customer", "9").await;

    let response = get(&app.router, "/api/v1/locks").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let locks = json["data"].as_array().unwrap();
    assert_eq!(locks.len(), 2);
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

#[tokio::test]
async fn expire_evicts_only_locks_past_their_timeout() {
    let app = build_test_app();
    acquire(&app.router, ALICE, "invoice", "1").await;
    acquire(&app.router, ALICE, "customer", "1").await;
    app.clock.advance(chrono::Duration::seconds(61));

    let response = post_json_as(
        &app.router,
        "/api/v1/admin/locks/expire",
        None,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["scanned"], 2);
    assert_eq!(json["data"]["expired"], 1);
    assert_eq!(json["data"]["orphaned"], 0);

    let remaining = app.coordinator.current_locks();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].resource_type, "customer");
}

#[tokio::test]
async fn reload_endpoint_acknowledges() {
    let app = build_test_app();

    let response = post_json_as(
        &app.router,
        "/api/v1/admin/locks/reload",
        None,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["reloaded"], true);
}

// ---------------------------------------------------------------------------
// Health and middleware
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_lock_count() {
    let app = build_test_app();
    acquire(&app.router, ALICE, "invoice", "1").await;

    let response = get(&app.router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert!(json["node_id"].is_string());
    assert_eq!(json["lock_count"], 1);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = build_test_app();
    let response = get(&app.router, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app();
    let response = get(&app.router, "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
