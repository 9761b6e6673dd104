//! Schedule and availability endpoints

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use codecamp_common::db::{Timeslot, Track};

use super::events::EventQuery;
use super::ApiError;
use crate::schedule::{self, ScheduleEntry, TimeslotView, TrackView};
use crate::AppState;

/// GET /api/schedule
pub async fn get_active_schedule(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScheduleEntry>>, ApiError> {
    Ok(Json(schedule::build_active_schedule(&state.db).await?))
}

/// GET /api/events/:event_id/schedule
pub async fn get_event_schedule(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<ScheduleEntry>>, ApiError> {
    Ok(Json(schedule::build_schedule(&state.db, event_id).await?))
}

/// GET /api/sessions/:session_id/available-tracks
pub async fn get_available_tracks(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Query(query): Query<EventQuery>,
) -> Result<Json<Vec<Track>>, ApiError> {
    let tracks = schedule::available_tracks(&state.db, session_id, query.event_id).await?;
    Ok(Json(tracks))
}

/// GET /api/sessions/:session_id/available-track-options
pub async fn get_available_track_options(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Query(query): Query<EventQuery>,
) -> Result<Json<Vec<TrackView>>, ApiError> {
    let views = schedule::available_track_views(&state.db, session_id, query.event_id).await?;
    Ok(Json(views))
}

/// GET /api/sessions/:session_id/available-timeslots
pub async fn get_available_timeslots(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Query(query): Query<EventQuery>,
) -> Result<Json<Vec<Timeslot>>, ApiError> {
    let timeslots = schedule::available_timeslots(&state.db, session_id, query.event_id).await?;
    Ok(Json(timeslots))
}

/// GET /api/sessions/:session_id/available-timeslot-options
pub async fn get_available_timeslot_options(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Query(query): Query<EventQuery>,
) -> Result<Json<Vec<TimeslotView>>, ApiError> {
    let views = schedule::available_timeslot_views(&state.db, session_id, query.event_id).await?;
    Ok(Json(views))
}

/// GET /api/available-track-options
///
/// Keyed by session id.
pub async fn get_track_options_by_session(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Result<Json<BTreeMap<i64, Vec<TrackView>>>, ApiError> {
    Ok(Json(schedule::track_options_by_session(&state.db, query.event_id).await?))
}

/// GET /api/available-timeslot-options
///
/// Keyed by session id.
pub async fn get_timeslot_options_by_session(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Result<Json<BTreeMap<i64, Vec<TimeslotView>>>, ApiError> {
    Ok(Json(schedule::timeslot_options_by_session(&state.db, query.event_id).await?))
}
