//! Event endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use codecamp_common::db::Event;
use serde::Deserialize;

use super::ApiError;
use crate::db::events;
use crate::AppState;

/// Optional `?event_id=` override; absent means the active event
#[derive(Debug, Default, Deserialize)]
pub struct EventQuery {
    pub event_id: Option<i64>,
}

/// GET /api/events/active
pub async fn get_active_event(State(state): State<AppState>) -> Result<Json<Event>, ApiError> {
    events::get_active_event(&state.db)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No active event".to_string()))
}

/// POST /api/events/:event_id/activate
pub async fn activate_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<Event>, ApiError> {
    let event = events::activate_event(&state.db, event_id).await?;
    Ok(Json(event))
}
