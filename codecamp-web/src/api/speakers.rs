//! Speaker endpoints

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::ApiError;
use crate::db::{events, speakers};
use crate::db::speakers::{SpeakerDetails, SpeakerSummary, SpeakerUpdate};
use crate::images::{self, ImageUpload};
use crate::AppState;

/// Body of a speaker edit
#[derive(Debug, Deserialize)]
pub struct SpeakerEditRequest {
    #[serde(flatten)]
    pub speaker: SpeakerUpdate,
    /// Replaces the stored image when present
    #[serde(default)]
    pub image: Option<ImageUpload>,
}

/// GET /api/speakers
///
/// Speakers of the active event, or every speaker when none is active.
pub async fn list_speakers(
    State(state): State<AppState>,
) -> Result<Json<Vec<SpeakerSummary>>, ApiError> {
    let list = match events::get_active_event(&state.db).await? {
        Some(event) => speakers::speakers_for_event(&state.db, event.event_id).await?,
        None => speakers::all_speakers(&state.db).await?,
    };
    debug!("Listing {} speakers", list.len());
    Ok(Json(list))
}

/// GET /api/speakers/:speaker_id
pub async fn get_speaker(
    State(state): State<AppState>,
    Path(speaker_id): Path<i64>,
) -> Result<Json<SpeakerDetails>, ApiError> {
    speakers::get_speaker_details(&state.db, speaker_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Speaker {} not found", speaker_id)))
}

/// GET /api/speakers/:speaker_id/image
pub async fn get_speaker_image(
    State(state): State<AppState>,
    Path(speaker_id): Path<i64>,
) -> Result<Response, ApiError> {
    let png = speakers::get_speaker_image(&state.db, speaker_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Speaker {} has no image", speaker_id)))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

/// POST /api/speakers/:speaker_id
///
/// Image problems are reported before anything is written.
pub async fn update_speaker(
    State(state): State<AppState>,
    Path(speaker_id): Path<i64>,
    Json(request): Json<SpeakerEditRequest>,
) -> Result<Json<Value>, ApiError> {
    if request.speaker.speaker_id != speaker_id {
        return Err(ApiError::NotFound(format!(
            "Speaker {} does not match request body",
            speaker_id
        )));
    }

    let image = match &request.image {
        Some(upload) => images::process_upload(upload, &state.uploads)?,
        None => None,
    };

    speakers::update_speaker_and_user(&state.db, &request.speaker, image).await?;

    Ok(Json(json!({
        "status": "ok",
        "speaker_id": speaker_id,
    })))
}
