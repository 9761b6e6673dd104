//! Announcement queries

use chrono::NaiveDate;
use codecamp_common::db::Announcement;
use codecamp_common::{Error, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;

/// Fields for a new announcement
#[derive(Debug, Clone, Deserialize)]
pub struct NewAnnouncement {
    pub event_id: Option<i64>,
    pub message: String,
    #[serde(default)]
    pub rank: i64,
    pub publish_on: NaiveDate,
    pub expires_on: Option<NaiveDate>,
}

/// Announcements visible on `today`
///
/// Includes the event's announcements (when `event_id` is set) and those not
/// tied to any event. Published on or before `today`, not yet expired.
pub async fn current_announcements(
    db: &SqlitePool,
    event_id: Option<i64>,
    today: NaiveDate,
) -> Result<Vec<Announcement>> {
    let announcements = sqlx::query_as::<_, Announcement>(
        r#"
        SELECT announcement_id, event_id, message, rank, publish_on, expires_on
        FROM announcements
        WHERE (event_id IS NULL OR event_id = ?)
          AND publish_on <= ?
          AND (expires_on IS NULL OR expires_on > ?)
        ORDER BY rank, publish_on DESC, announcement_id
        "#,
    )
    .bind(event_id)
    .bind(today)
    .bind(today)
    .fetch_all(db)
    .await?;

    Ok(announcements)
}

pub async fn create_announcement(db: &SqlitePool, new: &NewAnnouncement) -> Result<Announcement> {
    if new.message.trim().is_empty() {
        return Err(Error::InvalidInput("Announcement message is empty".to_string()));
    }
    if let Some(expires_on) = new.expires_on {
        if expires_on < new.publish_on {
            return Err(Error::InvalidInput(format!(
                "expires_on {} precedes publish_on {}",
                expires_on, new.publish_on
            )));
        }
    }

    let announcement = sqlx::query_as::<_, Announcement>(
        r#"
        INSERT INTO announcements (event_id, message, rank, publish_on, expires_on)
        VALUES (?, ?, ?, ?, ?)
        RETURNING announcement_id, event_id, message, rank, publish_on, expires_on
        "#,
    )
    .bind(new.event_id)
    .bind(&new.message)
    .bind(new.rank)
    .bind(new.publish_on)
    .bind(new.expires_on)
    .fetch_one(db)
    .await?;

    info!("Created announcement {}", announcement.announcement_id);
    Ok(announcement)
}
