//! codecamp-web library - Codecamp event service
//!
//! Schedule, availability, speaker and announcement endpoints over the shared
//! SQLite database.

use axum::{extract::DefaultBodyLimit, Router};
use codecamp_common::config::{TomlConfig, UploadConfig};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod images;
pub mod schedule;

/// Smallest request body limit, whatever the upload settings
const MIN_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Room for the non-image fields of a speaker edit
const BODY_HEADROOM_BYTES: usize = 64 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// 0 disables write authentication
    pub shared_secret: i64,
    /// Accepted age of a signed request, in milliseconds
    pub auth_window_ms: i64,
    pub uploads: UploadConfig,
}

impl AppState {
    /// State with default upload limits and auth window
    pub fn new(db: SqlitePool, shared_secret: i64) -> Self {
        Self::from_config(db, shared_secret, &TomlConfig::default())
    }

    /// Largest accepted request body
    ///
    /// Fits a base64-encoded image at the upload cap plus the other fields of
    /// a speaker edit.
    pub fn body_limit(&self) -> usize {
        let encoded_image = self.uploads.max_image_size_bytes.div_ceil(3) * 4;
        (encoded_image + BODY_HEADROOM_BYTES).max(MIN_BODY_LIMIT_BYTES)
    }

    pub fn from_config(db: SqlitePool, shared_secret: i64, config: &TomlConfig) -> Self {
        Self {
            db,
            shared_secret,
            auth_window_ms: config.auth.timestamp_window_ms,
            uploads: config.uploads.clone(),
        }
    }
}

/// Build application router
///
/// Reads are public; writes sit behind the shared-secret middleware.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    let body_limit = state.body_limit();

    let protected = Router::new()
        .route("/api/events/:event_id/activate", post(api::activate_event))
        .route("/api/sessions/:session_id/assignment", post(api::assign_session))
        .route("/api/speakers/:speaker_id", post(api::update_speaker))
        .route("/api/announcements", post(api::create_announcement))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    let public = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/events/active", get(api::get_active_event))
        .route("/api/schedule", get(api::get_active_schedule))
        .route("/api/events/:event_id/schedule", get(api::get_event_schedule))
        .route("/api/sessions/:session_id", get(api::get_session))
        .route(
            "/api/sessions/:session_id/available-tracks",
            get(api::get_available_tracks),
        )
        .route(
            "/api/sessions/:session_id/available-track-options",
            get(api::get_available_track_options),
        )
        .route(
            "/api/sessions/:session_id/available-timeslots",
            get(api::get_available_timeslots),
        )
        .route(
            "/api/sessions/:session_id/available-timeslot-options",
            get(api::get_available_timeslot_options),
        )
        .route("/api/available-track-options", get(api::get_track_options_by_session))
        .route(
            "/api/available-timeslot-options",
            get(api::get_timeslot_options_by_session),
        )
        .route("/api/speakers", get(api::list_speakers))
        .route("/api/speakers/:speaker_id", get(api::get_speaker))
        .route("/api/speakers/:speaker_id/image", get(api::get_speaker_image))
        .route("/api/announcements", get(api::list_announcements))
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
