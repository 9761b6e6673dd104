//! Session endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use codecamp_common::db::Session;
use serde::Deserialize;

use super::ApiError;
use crate::db::sessions;
use crate::AppState;

/// Body of an assignment request; `null` or absent clears the field
#[derive(Debug, Deserialize)]
pub struct AssignmentRequest {
    #[serde(default)]
    pub track_id: Option<i64>,
    #[serde(default)]
    pub timeslot_id: Option<i64>,
}

/// GET /api/sessions/:session_id
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Result<Json<Session>, ApiError> {
    sessions::get_session(&state.db, session_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Session {} not found", session_id)))
}

/// POST /api/sessions/:session_id/assignment
pub async fn assign_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Json(request): Json<AssignmentRequest>,
) -> Result<Json<Session>, ApiError> {
    let session =
        sessions::assign_session(&state.db, session_id, request.track_id, request.timeslot_id)
            .await?;
    Ok(Json(session))
}
