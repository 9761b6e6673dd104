//! Database initialization
//!
//! Creates the database file on first run and brings the schema up to date.
//! Every `create_*` function is idempotent (`CREATE TABLE IF NOT EXISTS`), so
//! opening an existing database runs the same sequence safely.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL lets request handlers read while an edit is being committed
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create every table and index used by the service
///
/// Separate from [`init_database`] so tests can apply the schema to an
/// in-memory pool.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_settings_table(pool).await?;
    create_users_table(pool).await?;
    create_events_table(pool).await?;
    create_tracks_table(pool).await?;
    create_timeslots_table(pool).await?;
    create_sessions_table(pool).await?;
    create_speakers_table(pool).await?;
    create_speaker_sessions_table(pool).await?;
    create_announcements_table(pool).await?;

    Ok(())
}

/// Create the settings table
///
/// Stores application configuration key-value pairs.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL DEFAULT '',
            email TEXT,
            phone_number TEXT,
            geographic_location TEXT,
            twitter_handle TEXT,
            is_volunteer INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_events_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            event_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the tracks table
///
/// A track is a room-bound lane of sessions within one event.
pub async fn create_tracks_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tracks (
            track_id INTEGER PRIMARY KEY,
            event_id INTEGER NOT NULL REFERENCES events(event_id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            room_number TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tracks_event ON tracks(event_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the timeslots table
///
/// Start and end times are stored as `YYYY-MM-DD HH:MM:SS` text, so ordering by
/// the column is chronological.
pub async fn create_timeslots_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS timeslots (
            timeslot_id INTEGER PRIMARY KEY,
            event_id INTEGER NOT NULL REFERENCES events(event_id) ON DELETE CASCADE,
            start_time TIMESTAMP NOT NULL,
            end_time TIMESTAMP NOT NULL,
            contains_no_sessions INTEGER NOT NULL DEFAULT 0,
            CHECK (end_time >= start_time)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_timeslots_event ON timeslots(event_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the sessions table
///
/// `track_id` and `timeslot_id` are NULL until the session is scheduled.
pub async fn create_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            session_id INTEGER PRIMARY KEY,
            event_id INTEGER NOT NULL REFERENCES events(event_id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            skill_level INTEGER NOT NULL DEFAULT 1,
            keywords TEXT NOT NULL DEFAULT '',
            is_approved INTEGER NOT NULL DEFAULT 0,
            track_id INTEGER REFERENCES tracks(track_id) ON DELETE SET NULL,
            timeslot_id INTEGER REFERENCES timeslots(timeslot_id) ON DELETE SET NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_event ON sessions(event_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_track ON sessions(track_id, timeslot_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_speakers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS speakers (
            speaker_id INTEGER PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(user_id),
            company_name TEXT,
            bio TEXT,
            website_url TEXT,
            blog_url TEXT,
            image BLOB,
            note_to_organizers TEXT,
            is_mvp INTEGER NOT NULL DEFAULT 0,
            linked_in TEXT,
            is_approved INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_speaker_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS speaker_sessions (
            speaker_id INTEGER NOT NULL REFERENCES speakers(speaker_id) ON DELETE CASCADE,
            session_id INTEGER NOT NULL REFERENCES sessions(session_id) ON DELETE CASCADE,
            PRIMARY KEY (speaker_id, session_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_speaker_sessions_session ON speaker_sessions(session_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_announcements_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS announcements (
            announcement_id INTEGER PRIMARY KEY,
            event_id INTEGER REFERENCES events(event_id) ON DELETE CASCADE,
            message TEXT NOT NULL,
            rank INTEGER NOT NULL DEFAULT 0,
            publish_on DATE NOT NULL,
            expires_on DATE,
            CHECK (expires_on IS NULL OR expires_on >= publish_on)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
