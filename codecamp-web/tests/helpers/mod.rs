//! Shared fixtures for codecamp-web integration tests
//!
//! - In-memory database with the real schema
//! - Event builders for tracks, timeslots and sessions
//! - Router request helpers (plain GET, signed POST, JSON body extraction)

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
};
use chrono::{NaiveDate, NaiveDateTime};
use codecamp_common::api::auth::sign_request;
use codecamp_web::db::events::create_event;
use codecamp_web::db::layout::{create_timeslot, create_track};
use codecamp_web::db::sessions::{create_session, NewSession};
use codecamp_web::{build_router, AppState};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

pub const TEST_SECRET: i64 = 12345;

pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    codecamp_common::db::create_schema(&pool)
        .await
        .expect("schema");
    pool
}

pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 10, 5)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// One event with helpers to grow its layout
pub struct EventFixture {
    pub db: SqlitePool,
    pub event_id: i64,
}

impl EventFixture {
    pub async fn new(db: &SqlitePool, name: &str, active: bool) -> Self {
        let event_id = create_event(db, name, active).await.unwrap();
        Self {
            db: db.clone(),
            event_id,
        }
    }

    pub async fn track(&self, name: &str, room: &str) -> i64 {
        create_track(&self.db, self.event_id, name, room).await.unwrap()
    }

    /// Fifty-minute slot starting at `hour`
    pub async fn timeslot(&self, hour: u32) -> i64 {
        create_timeslot(&self.db, self.event_id, at(hour, 0), at(hour, 50), false)
            .await
            .unwrap()
    }

    pub async fn session(&self, name: &str) -> i64 {
        create_session(&self.db, &NewSession::new(self.event_id, name))
            .await
            .unwrap()
    }

    pub async fn scheduled_session(&self, name: &str, track_id: i64, timeslot_id: i64) -> i64 {
        let mut session = NewSession::new(self.event_id, name);
        session.track_id = Some(track_id);
        session.timeslot_id = Some(timeslot_id);
        create_session(&self.db, &session).await.unwrap()
    }
}

/// Router with authentication enabled and a generous timestamp window
pub fn app(db: SqlitePool) -> axum::Router {
    let mut state = AppState::new(db, TEST_SECRET);
    state.auth_window_ms = 60_000;
    build_router(state)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// POST with `timestamp` and `hash` filled in for [`TEST_SECRET`]
pub fn signed_post(uri: &str, body: Value) -> Request<Body> {
    let now = chrono::Utc::now().timestamp_millis();
    post_json(uri, &sign_request(body, TEST_SECRET, now))
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
