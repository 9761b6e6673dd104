//! Track and timeslot queries
//!
//! Includes the single-session availability queries. Each is one aggregate
//! statement, so the cost does not grow with one query per track.

use chrono::NaiveDateTime;
use codecamp_common::db::{Timeslot, Track};
use codecamp_common::Result;
use sqlx::SqlitePool;

/// All tracks of an event, by name
pub async fn tracks_for_event(db: &SqlitePool, event_id: i64) -> Result<Vec<Track>> {
    let tracks = sqlx::query_as::<_, Track>(
        "SELECT track_id, event_id, name, room_number FROM tracks
         WHERE event_id = ?
         ORDER BY name, track_id",
    )
    .bind(event_id)
    .fetch_all(db)
    .await?;

    Ok(tracks)
}

/// All timeslots of an event, by start time
pub async fn timeslots_for_event(db: &SqlitePool, event_id: i64) -> Result<Vec<Timeslot>> {
    let timeslots = sqlx::query_as::<_, Timeslot>(
        "SELECT timeslot_id, event_id, start_time, end_time, contains_no_sessions FROM timeslots
         WHERE event_id = ?
         ORDER BY start_time, timeslot_id",
    )
    .bind(event_id)
    .fetch_all(db)
    .await?;

    Ok(timeslots)
}

/// Tracks of the event that still have a free timeslot, plus `current_track_id`
///
/// A track is full once the number of distinct timeslots taken by sessions on
/// it reaches the event's timeslot count.
pub async fn query_available_tracks(
    db: &SqlitePool,
    event_id: i64,
    current_track_id: Option<i64>,
) -> Result<Vec<Track>> {
    let tracks = sqlx::query_as::<_, Track>(
        r#"
        SELECT t.track_id, t.event_id, t.name, t.room_number
        FROM tracks t
        WHERE t.event_id = ?
          AND (
            (SELECT COUNT(DISTINCT s.timeslot_id)
               FROM sessions s
              WHERE s.track_id = t.track_id
                AND s.event_id = t.event_id)
            < (SELECT COUNT(*) FROM timeslots ts WHERE ts.event_id = t.event_id)
            OR t.track_id IS ?
          )
        ORDER BY t.name, t.track_id
        "#,
    )
    .bind(event_id)
    .bind(current_track_id)
    .fetch_all(db)
    .await?;

    Ok(tracks)
}

/// Timeslots of the event not taken on `current_track_id`, plus `current_timeslot_id`
///
/// With no current track nothing is taken, so every timeslot of the event is
/// returned.
pub async fn query_available_timeslots(
    db: &SqlitePool,
    event_id: i64,
    current_track_id: Option<i64>,
    current_timeslot_id: Option<i64>,
) -> Result<Vec<Timeslot>> {
    let timeslots = sqlx::query_as::<_, Timeslot>(
        r#"
        SELECT ts.timeslot_id, ts.event_id, ts.start_time, ts.end_time, ts.contains_no_sessions
        FROM timeslots ts
        WHERE ts.event_id = ?
          AND (
            ts.timeslot_id NOT IN (
              SELECT s.timeslot_id
                FROM sessions s
               WHERE s.event_id = ts.event_id
                 AND s.track_id = ?
                 AND s.timeslot_id IS NOT NULL
            )
            OR ts.timeslot_id IS ?
          )
        ORDER BY ts.start_time, ts.timeslot_id
        "#,
    )
    .bind(event_id)
    .bind(current_track_id)
    .bind(current_timeslot_id)
    .fetch_all(db)
    .await?;

    Ok(timeslots)
}

pub async fn create_track(
    db: &SqlitePool,
    event_id: i64,
    name: &str,
    room_number: &str,
) -> Result<i64> {
    let result = sqlx::query("INSERT INTO tracks (event_id, name, room_number) VALUES (?, ?, ?)")
        .bind(event_id)
        .bind(name)
        .bind(room_number)
        .execute(db)
        .await?;

    Ok(result.last_insert_rowid())
}

pub async fn create_timeslot(
    db: &SqlitePool,
    event_id: i64,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    contains_no_sessions: bool,
) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO timeslots (event_id, start_time, end_time, contains_no_sessions)
         VALUES (?, ?, ?, ?)",
    )
    .bind(event_id)
    .bind(start_time)
    .bind(end_time)
    .bind(contains_no_sessions)
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}
