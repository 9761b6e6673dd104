//! Announcement endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use codecamp_common::db::Announcement;

use super::events::EventQuery;
use super::ApiError;
use crate::db::announcements::{self, NewAnnouncement};
use crate::db::events;
use crate::AppState;

/// GET /api/announcements
///
/// Event-less announcements are always included, even with no event resolved.
pub async fn list_announcements(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Result<Json<Vec<Announcement>>, ApiError> {
    let event_id = events::resolve_event_id(&state.db, query.event_id).await?;
    let today = chrono::Local::now().date_naive();

    let list = announcements::current_announcements(&state.db, event_id, today).await?;
    Ok(Json(list))
}

/// POST /api/announcements
pub async fn create_announcement(
    State(state): State<AppState>,
    Json(request): Json<NewAnnouncement>,
) -> Result<(StatusCode, Json<Announcement>), ApiError> {
    let announcement = announcements::create_announcement(&state.db, &request).await?;
    Ok((StatusCode::CREATED, Json(announcement)))
}
