//! Security tests for write endpoints
//!
//! - Signed requests pass, unsigned or tampered ones are rejected
//! - Stale and out-of-range timestamps are rejected
//! - A shared secret of 0 disables the check
//! - Read endpoints never require a signature
//! - Request bodies over 10MB are refused

mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use codecamp_common::api::auth::sign_request;
use codecamp_web::{build_router, AppState};
use helpers::{app, get, json_body, post_json, signed_post, test_pool, EventFixture, TEST_SECRET};
use serde_json::json;
use tower::util::ServiceExt;

#[tokio::test]
async fn test_signed_request_accepted() {
    let db = test_pool().await;
    let event = EventFixture::new(&db, "Codecamp 2024", false).await;

    let uri = format!("/api/events/{}/activate", event.event_id);
    let response = app(db).oneshot(signed_post(&uri, json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_auth_fields_rejected() {
    let db = test_pool().await;
    let event = EventFixture::new(&db, "Codecamp 2024", false).await;

    let uri = format!("/api/events/{}/activate", event.event_id);
    let response = app(db).oneshot(post_json(&uri, &json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_json_rejected() {
    let app = app(test_pool().await);

    let request = Request::builder()
        .method("POST")
        .uri("/api/announcements")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_secret_rejected() {
    let db = test_pool().await;
    let event = EventFixture::new(&db, "Codecamp 2024", false).await;

    let now = chrono::Utc::now().timestamp_millis();
    let body = sign_request(json!({}), TEST_SECRET + 1, now);
    let uri = format!("/api/events/{}/activate", event.event_id);

    let response = app(db).oneshot(post_json(&uri, &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "Invalid hash");
}

#[tokio::test]
async fn test_tampered_body_rejected() {
    let db = test_pool().await;
    let event = EventFixture::new(&db, "Codecamp 2024", true).await;
    let cloud = event.track("Cloud", "101").await;
    let session = event.session("S").await;

    let now = chrono::Utc::now().timestamp_millis();
    let mut body = sign_request(json!({"track_id": null}), TEST_SECRET, now);
    body["track_id"] = json!(cloud);

    let uri = format!("/api/sessions/{}/assignment", session);
    let response = app(db).oneshot(post_json(&uri, &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_stale_timestamp_rejected() {
    let db = test_pool().await;
    let event = EventFixture::new(&db, "Codecamp 2024", false).await;

    let stale = chrono::Utc::now().timestamp_millis() - 120_000;
    let body = sign_request(json!({}), TEST_SECRET, stale);
    let uri = format!("/api/events/{}/activate", event.event_id);

    let response = app(db).oneshot(post_json(&uri, &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let error = json_body(response).await["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Invalid timestamp"), "got {}", error);
}

#[tokio::test]
async fn test_extreme_timestamps_rejected() {
    let db = test_pool().await;
    let event = EventFixture::new(&db, "Codecamp 2024", false).await;
    let app = app(db);
    let uri = format!("/api/events/{}/activate", event.event_id);

    for timestamp in [i64::MIN, i64::MAX] {
        let body = sign_request(json!({}), TEST_SECRET, timestamp);
        let response = app.clone().oneshot(post_json(&uri, &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "timestamp {}", timestamp);
    }
}

#[tokio::test]
async fn test_zero_secret_disables_auth() {
    let db = test_pool().await;
    let event = EventFixture::new(&db, "Codecamp 2024", false).await;
    let app = build_router(AppState::new(db, 0));

    let uri = format!("/api/events/{}/activate", event.event_id);
    let response = app.oneshot(post_json(&uri, &json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_reads_need_no_signature() {
    let app = app(test_pool().await);

    for uri in ["/api/schedule", "/api/speakers", "/api/announcements", "/health"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
    }
}

#[tokio::test]
async fn test_body_size_limit_10mb() {
    let app = app(test_pool().await);

    let large_body = vec![b'x'; 10 * 1024 * 1024 + 1024];
    let request = Request::builder()
        .method("POST")
        .uri("/api/announcements")
        .header("Content-Type", "application/json")
        .body(Body::from(large_body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(
        response.status() == StatusCode::PAYLOAD_TOO_LARGE
            || response.status() == StatusCode::BAD_REQUEST,
        "Expected 413/400 for oversized body, got {}",
        response.status()
    );
}
