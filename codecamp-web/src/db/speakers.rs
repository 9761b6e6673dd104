//! Speaker and user queries
//!
//! Speaker rows always point at one user row; the read models here join the
//! two so handlers never issue a second query for names.

use codecamp_common::db::new_user_id;
use codecamp_common::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use tracing::info;

/// Speaker list row, without image bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct SpeakerSummary {
    pub speaker_id: i64,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: Option<String>,
    pub is_mvp: bool,
    pub is_approved: bool,
}

/// Speaker and user fields for a single speaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct SpeakerDetails {
    pub speaker_id: i64,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub geographic_location: Option<String>,
    pub twitter_handle: Option<String>,
    pub is_volunteer: bool,
    pub company_name: Option<String>,
    pub bio: Option<String>,
    pub website_url: Option<String>,
    pub blog_url: Option<String>,
    pub note_to_organizers: Option<String>,
    pub is_mvp: bool,
    pub linked_in: Option<String>,
    pub is_approved: bool,
    pub has_image: bool,
}

/// Speaker attached to a session, as shown in the schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SessionSpeaker {
    pub session_id: i64,
    pub speaker_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub company_name: Option<String>,
}

/// Editable speaker and user fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SpeakerUpdate {
    pub speaker_id: i64,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: Option<String>,
    pub bio: Option<String>,
    pub website_url: Option<String>,
    pub blog_url: Option<String>,
    pub geographic_location: Option<String>,
    pub twitter_handle: Option<String>,
    pub linked_in: Option<String>,
    #[serde(default)]
    pub is_volunteer: bool,
    #[serde(default)]
    pub is_mvp: bool,
    pub note_to_organizers: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub is_approved: bool,
}

const SUMMARY_SELECT: &str = "SELECT DISTINCT sp.speaker_id, sp.user_id, u.first_name, u.last_name,
                                     sp.company_name, sp.is_mvp, sp.is_approved
                              FROM speakers sp
                              JOIN users u ON u.user_id = sp.user_id";

/// Speakers with at least one session in the event, by last then first name
pub async fn speakers_for_event(db: &SqlitePool, event_id: i64) -> Result<Vec<SpeakerSummary>> {
    let sql = format!(
        "{}
         JOIN speaker_sessions ss ON ss.speaker_id = sp.speaker_id
         JOIN sessions s ON s.session_id = ss.session_id
         WHERE s.event_id = ?
         ORDER BY u.last_name, u.first_name, sp.speaker_id",
        SUMMARY_SELECT
    );
    let speakers = sqlx::query_as::<_, SpeakerSummary>(&sql)
        .bind(event_id)
        .fetch_all(db)
        .await?;

    Ok(speakers)
}

pub async fn all_speakers(db: &SqlitePool) -> Result<Vec<SpeakerSummary>> {
    let sql = format!(
        "{} ORDER BY u.last_name, u.first_name, sp.speaker_id",
        SUMMARY_SELECT
    );
    let speakers = sqlx::query_as::<_, SpeakerSummary>(&sql).fetch_all(db).await?;

    Ok(speakers)
}

pub async fn get_speaker_details(db: &SqlitePool, speaker_id: i64) -> Result<Option<SpeakerDetails>> {
    let details = sqlx::query_as::<_, SpeakerDetails>(
        r#"
        SELECT sp.speaker_id, sp.user_id, u.first_name, u.last_name, u.email, u.phone_number,
               u.geographic_location, u.twitter_handle, u.is_volunteer,
               sp.company_name, sp.bio, sp.website_url, sp.blog_url, sp.note_to_organizers,
               sp.is_mvp, sp.linked_in, sp.is_approved,
               (sp.image IS NOT NULL) AS has_image
        FROM speakers sp
        JOIN users u ON u.user_id = sp.user_id
        WHERE sp.speaker_id = ?
        "#,
    )
    .bind(speaker_id)
    .fetch_optional(db)
    .await?;

    Ok(details)
}

/// Stored PNG bytes; `None` when the speaker or the image is missing
pub async fn get_speaker_image(db: &SqlitePool, speaker_id: i64) -> Result<Option<Vec<u8>>> {
    let image: Option<Option<Vec<u8>>> =
        sqlx::query_scalar("SELECT image FROM speakers WHERE speaker_id = ?")
            .bind(speaker_id)
            .fetch_optional(db)
            .await?;

    Ok(image.flatten())
}

/// Speaker links for every session of the event
pub async fn session_speakers_for_event(
    db: &SqlitePool,
    event_id: i64,
) -> Result<Vec<SessionSpeaker>> {
    let rows = sqlx::query_as::<_, SessionSpeaker>(
        r#"
        SELECT ss.session_id, ss.speaker_id, u.first_name, u.last_name, sp.company_name
        FROM speaker_sessions ss
        JOIN sessions s ON s.session_id = ss.session_id
        JOIN speakers sp ON sp.speaker_id = ss.speaker_id
        JOIN users u ON u.user_id = sp.user_id
        WHERE s.event_id = ?
        ORDER BY ss.session_id, u.last_name, u.first_name, ss.speaker_id
        "#,
    )
    .bind(event_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

/// Write speaker and user fields together
///
/// `image` replaces the stored image when `Some`; `None` keeps it. Either row
/// missing rolls the whole update back with `NotFound`.
pub async fn update_speaker_and_user(
    db: &SqlitePool,
    update: &SpeakerUpdate,
    image: Option<Vec<u8>>,
) -> Result<()> {
    let mut tx = db.begin().await?;

    let speaker_rows = sqlx::query(
        r#"
        UPDATE speakers
        SET company_name = ?, bio = ?, website_url = ?, blog_url = ?,
            note_to_organizers = ?, is_mvp = ?, linked_in = ?, is_approved = ?,
            image = COALESCE(?, image)
        WHERE speaker_id = ? AND user_id = ?
        "#,
    )
    .bind(&update.company_name)
    .bind(&update.bio)
    .bind(&update.website_url)
    .bind(&update.blog_url)
    .bind(&update.note_to_organizers)
    .bind(update.is_mvp)
    .bind(&update.linked_in)
    .bind(update.is_approved)
    .bind(image)
    .bind(update.speaker_id)
    .bind(&update.user_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if speaker_rows == 0 {
        return Err(Error::NotFound(format!(
            "Speaker {} for user {}",
            update.speaker_id, update.user_id
        )));
    }

    let user_rows = sqlx::query(
        r#"
        UPDATE users
        SET first_name = ?, last_name = ?, geographic_location = ?, twitter_handle = ?,
            is_volunteer = ?, email = ?, phone_number = ?, updated_at = CURRENT_TIMESTAMP
        WHERE user_id = ?
        "#,
    )
    .bind(&update.first_name)
    .bind(&update.last_name)
    .bind(&update.geographic_location)
    .bind(&update.twitter_handle)
    .bind(update.is_volunteer)
    .bind(&update.email)
    .bind(&update.phone_number)
    .bind(&update.user_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if user_rows == 0 {
        return Err(Error::NotFound(format!("User {}", update.user_id)));
    }

    tx.commit().await?;

    info!("Updated speaker {} ({} {})", update.speaker_id, update.first_name, update.last_name);
    Ok(())
}

pub async fn create_user(db: &SqlitePool, first_name: &str, last_name: &str) -> Result<String> {
    let user_id = new_user_id();
    sqlx::query("INSERT INTO users (user_id, first_name, last_name) VALUES (?, ?, ?)")
        .bind(&user_id)
        .bind(first_name)
        .bind(last_name)
        .execute(db)
        .await?;

    Ok(user_id)
}

pub async fn create_speaker(
    db: &SqlitePool,
    user_id: &str,
    company_name: Option<&str>,
) -> Result<i64> {
    let result = sqlx::query("INSERT INTO speakers (user_id, company_name) VALUES (?, ?)")
        .bind(user_id)
        .bind(company_name)
        .execute(db)
        .await?;

    Ok(result.last_insert_rowid())
}

pub async fn link_speaker_session(db: &SqlitePool, speaker_id: i64, session_id: i64) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO speaker_sessions (speaker_id, session_id) VALUES (?, ?)")
        .bind(speaker_id)
        .bind(session_id)
        .execute(db)
        .await?;

    Ok(())
}
