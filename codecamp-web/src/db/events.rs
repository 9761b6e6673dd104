//! Event queries and active-event resolution

use codecamp_common::db::Event;
use codecamp_common::{Error, Result};
use sqlx::SqlitePool;
use tracing::{debug, info};

pub async fn get_event(db: &SqlitePool, event_id: i64) -> Result<Option<Event>> {
    let event = sqlx::query_as::<_, Event>(
        "SELECT event_id, name, is_active FROM events WHERE event_id = ?",
    )
    .bind(event_id)
    .fetch_optional(db)
    .await?;

    Ok(event)
}

/// The currently active event, if any
///
/// Should more than one row carry the flag, the lowest id wins so the answer
/// is stable.
pub async fn get_active_event(db: &SqlitePool) -> Result<Option<Event>> {
    let event = sqlx::query_as::<_, Event>(
        "SELECT event_id, name, is_active FROM events
         WHERE is_active = 1
         ORDER BY event_id
         LIMIT 1",
    )
    .fetch_optional(db)
    .await?;

    Ok(event)
}

/// Turn an optional explicit event id into a concrete one
///
/// An explicit id is returned as-is; `None` falls back to the active event.
/// `Ok(None)` means no event could be resolved.
pub async fn resolve_event_id(db: &SqlitePool, event_id: Option<i64>) -> Result<Option<i64>> {
    match event_id {
        Some(id) => Ok(Some(id)),
        None => {
            let active = get_active_event(db).await?;
            debug!(active_event = ?active.as_ref().map(|e| e.event_id), "Resolved active event");
            Ok(active.map(|e| e.event_id))
        }
    }
}

pub async fn create_event(db: &SqlitePool, name: &str, is_active: bool) -> Result<i64> {
    let result = sqlx::query("INSERT INTO events (name, is_active) VALUES (?, ?)")
        .bind(name)
        .bind(is_active)
        .execute(db)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Make `event_id` the only active event
///
/// Both updates run in one transaction, so readers never observe zero or two
/// active events.
pub async fn activate_event(db: &SqlitePool, event_id: i64) -> Result<Event> {
    let mut tx = db.begin().await?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE event_id = ?)")
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

    if !exists {
        return Err(Error::NotFound(format!("Event {}", event_id)));
    }

    sqlx::query("UPDATE events SET is_active = 0 WHERE is_active = 1 AND event_id <> ?")
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

    let event = sqlx::query_as::<_, Event>(
        "UPDATE events SET is_active = 1 WHERE event_id = ?
         RETURNING event_id, name, is_active",
    )
    .bind(event_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    info!("Activated event {} ({})", event.event_id, event.name);
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        codecamp_common::db::create_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_no_active_event() {
        let db = setup_test_db().await;
        create_event(&db, "Codecamp 2023", false).await.unwrap();

        assert!(get_active_event(&db).await.unwrap().is_none());
        assert_eq!(resolve_event_id(&db, None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_explicit_event_id_wins() {
        let db = setup_test_db().await;
        let active = create_event(&db, "Codecamp 2024", true).await.unwrap();

        assert_eq!(resolve_event_id(&db, None).await.unwrap(), Some(active));
        assert_eq!(resolve_event_id(&db, Some(77)).await.unwrap(), Some(77));
    }

    #[tokio::test]
    async fn test_activate_leaves_single_active_event() {
        let db = setup_test_db().await;
        let old = create_event(&db, "Codecamp 2023", true).await.unwrap();
        let new = create_event(&db, "Codecamp 2024", false).await.unwrap();

        let event = activate_event(&db, new).await.unwrap();
        assert!(event.is_active);

        let active_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE is_active = 1")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(active_count, 1);
        assert!(!get_event(&db, old).await.unwrap().unwrap().is_active);
    }

    #[tokio::test]
    async fn test_activate_missing_event() {
        let db = setup_test_db().await;
        let active = create_event(&db, "Codecamp 2024", true).await.unwrap();

        let result = activate_event(&db, 999).await;
        assert!(matches!(result, Err(Error::NotFound(_))));

        // Rolled back: the previous active event is untouched
        assert_eq!(get_active_event(&db).await.unwrap().unwrap().event_id, active);
    }
}
