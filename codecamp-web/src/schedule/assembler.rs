//! Schedule assembly
//!
//! One entry per session of an event, with its track, timeslot and speakers
//! resolved. Unassigned sessions keep their entry with empty track fields and
//! null times.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use codecamp_common::{Result, SkillLevel};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::db::events;
use crate::db::speakers::{session_speakers_for_event, SessionSpeaker};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub session_id: i64,
    pub event_id: i64,
    pub name: String,
    pub description: String,
    pub keywords: String,
    pub skill_level_id: i64,
    pub skill_level: &'static str,
    pub is_approved: bool,
    pub track_id: Option<i64>,
    pub track_name: String,
    pub room_number: String,
    pub timeslot_id: Option<i64>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub speakers: Vec<SessionSpeaker>,
}

#[derive(Debug, FromRow)]
struct ScheduleRow {
    session_id: i64,
    event_id: i64,
    name: String,
    description: String,
    keywords: String,
    skill_level: i64,
    is_approved: bool,
    track_id: Option<i64>,
    track_name: String,
    room_number: String,
    timeslot_id: Option<i64>,
    start_time: Option<NaiveDateTime>,
    end_time: Option<NaiveDateTime>,
}

impl ScheduleRow {
    fn into_entry(self, speakers: Vec<SessionSpeaker>) -> ScheduleEntry {
        ScheduleEntry {
            session_id: self.session_id,
            event_id: self.event_id,
            name: self.name,
            description: self.description,
            keywords: self.keywords,
            skill_level_id: self.skill_level,
            skill_level: SkillLevel::from_code(self.skill_level).description(),
            is_approved: self.is_approved,
            track_id: self.track_id,
            track_name: self.track_name,
            room_number: self.room_number,
            timeslot_id: self.timeslot_id,
            start_time: self.start_time,
            end_time: self.end_time,
            speakers,
        }
    }
}

/// Schedule of one event
///
/// Ordered approved first, then by track name (unassigned first), then start
/// time (unscheduled first), then session id.
pub async fn build_schedule(db: &SqlitePool, event_id: i64) -> Result<Vec<ScheduleEntry>> {
    let rows = sqlx::query_as::<_, ScheduleRow>(
        r#"
        SELECT s.session_id, s.event_id, s.name, s.description, s.keywords, s.skill_level,
               s.is_approved,
               t.track_id AS track_id,
               COALESCE(t.name, '') AS track_name,
               COALESCE(t.room_number, '') AS room_number,
               ts.timeslot_id AS timeslot_id,
               ts.start_time AS start_time,
               ts.end_time AS end_time
        FROM sessions s
        LEFT JOIN tracks t ON t.track_id = s.track_id
        LEFT JOIN timeslots ts ON ts.timeslot_id = s.timeslot_id
        WHERE s.event_id = ?
        ORDER BY s.is_approved DESC, track_name, ts.start_time, s.session_id
        "#,
    )
    .bind(event_id)
    .fetch_all(db)
    .await?;

    let mut speakers_by_session: HashMap<i64, Vec<SessionSpeaker>> = HashMap::new();
    for speaker in session_speakers_for_event(db, event_id).await? {
        speakers_by_session
            .entry(speaker.session_id)
            .or_default()
            .push(speaker);
    }

    let entries: Vec<ScheduleEntry> = rows
        .into_iter()
        .map(|row| {
            let speakers = speakers_by_session.remove(&row.session_id).unwrap_or_default();
            row.into_entry(speakers)
        })
        .collect();

    debug!(event_id, count = entries.len(), "Built schedule");
    Ok(entries)
}

/// Schedule of the active event; empty when no event is active
pub async fn build_active_schedule(db: &SqlitePool) -> Result<Vec<ScheduleEntry>> {
    match events::get_active_event(db).await? {
        Some(event) => build_schedule(db, event.event_id).await,
        None => {
            debug!("No active event, returning empty schedule");
            Ok(Vec::new())
        }
    }
}
