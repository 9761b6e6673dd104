//! Session queries and track/timeslot assignment

use codecamp_common::db::Session;
use codecamp_common::{Error, Result};
use sqlx::SqlitePool;
use tracing::info;

const SESSION_COLUMNS: &str = "session_id, event_id, name, description, skill_level, keywords, \
                               is_approved, track_id, timeslot_id";

pub async fn get_session(db: &SqlitePool, session_id: i64) -> Result<Option<Session>> {
    let sql = format!("SELECT {} FROM sessions WHERE session_id = ?", SESSION_COLUMNS);
    let session = sqlx::query_as::<_, Session>(&sql)
        .bind(session_id)
        .fetch_optional(db)
        .await?;

    Ok(session)
}

pub async fn sessions_for_event(db: &SqlitePool, event_id: i64) -> Result<Vec<Session>> {
    let sql = format!(
        "SELECT {} FROM sessions WHERE event_id = ? ORDER BY session_id",
        SESSION_COLUMNS
    );
    let sessions = sqlx::query_as::<_, Session>(&sql)
        .bind(event_id)
        .fetch_all(db)
        .await?;

    Ok(sessions)
}

/// Fields for a new session row
#[derive(Debug, Clone)]
pub struct NewSession<'a> {
    pub event_id: i64,
    pub name: &'a str,
    pub description: &'a str,
    pub skill_level: i64,
    pub keywords: &'a str,
    pub is_approved: bool,
    pub track_id: Option<i64>,
    pub timeslot_id: Option<i64>,
}

impl<'a> NewSession<'a> {
    /// Approved beginner session without track or timeslot
    pub fn new(event_id: i64, name: &'a str) -> Self {
        Self {
            event_id,
            name,
            description: "",
            skill_level: 1,
            keywords: "",
            is_approved: true,
            track_id: None,
            timeslot_id: None,
        }
    }
}

pub async fn create_session(db: &SqlitePool, session: &NewSession<'_>) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO sessions
            (event_id, name, description, skill_level, keywords, is_approved, track_id, timeslot_id)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(session.event_id)
    .bind(session.name)
    .bind(session.description)
    .bind(session.skill_level)
    .bind(session.keywords)
    .bind(session.is_approved)
    .bind(session.track_id)
    .bind(session.timeslot_id)
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Set or clear the track and timeslot of a session
///
/// Fails with `NotFound` for an unknown session, `InvalidInput` when the track
/// or timeslot belongs to another event, and `Conflict` when another session
/// already holds the same (track, timeslot) pair.
pub async fn assign_session(
    db: &SqlitePool,
    session_id: i64,
    track_id: Option<i64>,
    timeslot_id: Option<i64>,
) -> Result<Session> {
    let mut tx = db.begin().await?;

    let event_id: Option<i64> =
        sqlx::query_scalar("SELECT event_id FROM sessions WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(&mut *tx)
            .await?;
    let event_id = event_id.ok_or_else(|| Error::NotFound(format!("Session {}", session_id)))?;

    if let Some(track_id) = track_id {
        let track_event: Option<i64> =
            sqlx::query_scalar("SELECT event_id FROM tracks WHERE track_id = ?")
                .bind(track_id)
                .fetch_optional(&mut *tx)
                .await?;
        if track_event != Some(event_id) {
            return Err(Error::InvalidInput(format!(
                "Track {} does not belong to event {}",
                track_id, event_id
            )));
        }
    }

    if let Some(timeslot_id) = timeslot_id {
        let timeslot_event: Option<i64> =
            sqlx::query_scalar("SELECT event_id FROM timeslots WHERE timeslot_id = ?")
                .bind(timeslot_id)
                .fetch_optional(&mut *tx)
                .await?;
        if timeslot_event != Some(event_id) {
            return Err(Error::InvalidInput(format!(
                "Timeslot {} does not belong to event {}",
                timeslot_id, event_id
            )));
        }
    }

    if let (Some(track_id), Some(timeslot_id)) = (track_id, timeslot_id) {
        let holder: Option<i64> = sqlx::query_scalar(
            "SELECT session_id FROM sessions
             WHERE track_id = ? AND timeslot_id = ? AND session_id <> ?
             LIMIT 1",
        )
        .bind(track_id)
        .bind(timeslot_id)
        .bind(session_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(holder) = holder {
            return Err(Error::Conflict(format!(
                "Track {} at timeslot {} is already held by session {}",
                track_id, timeslot_id, holder
            )));
        }
    }

    let sql = format!(
        "UPDATE sessions SET track_id = ?, timeslot_id = ? WHERE session_id = ? RETURNING {}",
        SESSION_COLUMNS
    );
    let session = sqlx::query_as::<_, Session>(&sql)
        .bind(track_id)
        .bind(timeslot_id)
        .bind(session_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(
        session_id,
        ?track_id,
        ?timeslot_id,
        "Updated session assignment"
    );
    Ok(session)
}
