//! Track and timeslot availability
//!
//! A track is open for a session while it has fewer distinct occupied
//! timeslots than the event has timeslots. A timeslot is open when no session
//! on the session's current track holds it. The session's own current track
//! and timeslot are always open to it.
//!
//! Single-session lookups run one aggregate query each. Batch lookups load an
//! [`EventLayout`] once and evaluate every session against it in memory.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use codecamp_common::db::{Session, Timeslot, Track};
use codecamp_common::Result;
use sqlx::SqlitePool;
use tracing::debug;

use super::view::{TimeslotView, TrackView};
use crate::db::{events, layout, sessions};

/// A session's current track and timeslot
///
/// Unknown sessions have neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Assignment {
    pub track_id: Option<i64>,
    pub timeslot_id: Option<i64>,
}

impl From<&Session> for Assignment {
    fn from(session: &Session) -> Self {
        Self {
            track_id: session.track_id,
            timeslot_id: session.timeslot_id,
        }
    }
}

async fn current_assignment(db: &SqlitePool, session_id: i64) -> Result<Assignment> {
    let session = sessions::get_session(db, session_id).await?;
    Ok(session.as_ref().map(Assignment::from).unwrap_or_default())
}

/// Tracks, timeslots and occupancy of one event
#[derive(Debug, Clone, Default)]
pub struct EventLayout {
    tracks: Vec<Track>,
    timeslots: Vec<Timeslot>,
    sessions: Vec<Session>,
    /// track_id -> timeslot ids taken on that track
    occupied: HashMap<i64, BTreeSet<i64>>,
}

impl EventLayout {
    /// Build from rows already restricted to one event
    pub fn from_parts(
        mut tracks: Vec<Track>,
        mut timeslots: Vec<Timeslot>,
        sessions: Vec<Session>,
    ) -> Self {
        tracks.sort_by(|a, b| a.name.cmp(&b.name).then(a.track_id.cmp(&b.track_id)));
        timeslots.sort_by(|a, b| {
            a.start_time
                .cmp(&b.start_time)
                .then(a.timeslot_id.cmp(&b.timeslot_id))
        });

        let mut occupied: HashMap<i64, BTreeSet<i64>> = HashMap::new();
        for session in &sessions {
            if let (Some(track_id), Some(timeslot_id)) = (session.track_id, session.timeslot_id) {
                occupied.entry(track_id).or_default().insert(timeslot_id);
            }
        }

        Self {
            tracks,
            timeslots,
            sessions,
            occupied,
        }
    }

    pub async fn load(db: &SqlitePool, event_id: i64) -> Result<Self> {
        let tracks = layout::tracks_for_event(db, event_id).await?;
        let timeslots = layout::timeslots_for_event(db, event_id).await?;
        let sessions = sessions::sessions_for_event(db, event_id).await?;

        debug!(
            event_id,
            tracks = tracks.len(),
            timeslots = timeslots.len(),
            sessions = sessions.len(),
            "Loaded event layout"
        );

        Ok(Self::from_parts(tracks, timeslots, sessions))
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    fn occupied_count(&self, track_id: i64) -> usize {
        self.occupied.get(&track_id).map_or(0, BTreeSet::len)
    }

    pub fn available_tracks(&self, current: Assignment) -> Vec<&Track> {
        let total = self.timeslots.len();
        self.tracks
            .iter()
            .filter(|t| {
                self.occupied_count(t.track_id) < total || current.track_id == Some(t.track_id)
            })
            .collect()
    }

    pub fn available_timeslots(&self, current: Assignment) -> Vec<&Timeslot> {
        let taken = current.track_id.and_then(|id| self.occupied.get(&id));
        self.timeslots
            .iter()
            .filter(|ts| {
                let is_taken = taken.is_some_and(|set| set.contains(&ts.timeslot_id));
                !is_taken || current.timeslot_id == Some(ts.timeslot_id)
            })
            .collect()
    }
}

/// Tracks `session_id` may be assigned to
///
/// `event_id` of `None` means the active event; no active event yields an
/// empty list.
pub async fn available_tracks(
    db: &SqlitePool,
    session_id: i64,
    event_id: Option<i64>,
) -> Result<Vec<Track>> {
    let Some(event_id) = events::resolve_event_id(db, event_id).await? else {
        return Ok(Vec::new());
    };

    let current = current_assignment(db, session_id).await?;
    let tracks = layout::query_available_tracks(db, event_id, current.track_id).await?;

    debug!(session_id, event_id, count = tracks.len(), "Available tracks");
    Ok(tracks)
}

pub async fn available_track_views(
    db: &SqlitePool,
    session_id: i64,
    event_id: Option<i64>,
) -> Result<Vec<TrackView>> {
    let tracks = available_tracks(db, session_id, event_id).await?;
    Ok(tracks.iter().map(TrackView::from).collect())
}

/// Timeslots `session_id` may be assigned to on its current track
///
/// A session without a track sees every timeslot of the event.
pub async fn available_timeslots(
    db: &SqlitePool,
    session_id: i64,
    event_id: Option<i64>,
) -> Result<Vec<Timeslot>> {
    let Some(event_id) = events::resolve_event_id(db, event_id).await? else {
        return Ok(Vec::new());
    };

    let current = current_assignment(db, session_id).await?;
    let timeslots =
        layout::query_available_timeslots(db, event_id, current.track_id, current.timeslot_id)
            .await?;

    debug!(session_id, event_id, count = timeslots.len(), "Available timeslots");
    Ok(timeslots)
}

pub async fn available_timeslot_views(
    db: &SqlitePool,
    session_id: i64,
    event_id: Option<i64>,
) -> Result<Vec<TimeslotView>> {
    let timeslots = available_timeslots(db, session_id, event_id).await?;
    Ok(timeslots.iter().map(TimeslotView::from).collect())
}

/// Track options for every session of the event, keyed by session id
pub async fn track_options_by_session(
    db: &SqlitePool,
    event_id: Option<i64>,
) -> Result<BTreeMap<i64, Vec<TrackView>>> {
    let Some(event_id) = events::resolve_event_id(db, event_id).await? else {
        return Ok(BTreeMap::new());
    };

    let layout = EventLayout::load(db, event_id).await?;

    Ok(layout
        .sessions()
        .iter()
        .map(|s| {
            let views = layout
                .available_tracks(Assignment::from(s))
                .into_iter()
                .map(TrackView::from)
                .collect();
            (s.session_id, views)
        })
        .collect())
}

/// Timeslot options for every session of the event, keyed by session id
pub async fn timeslot_options_by_session(
    db: &SqlitePool,
    event_id: Option<i64>,
) -> Result<BTreeMap<i64, Vec<TimeslotView>>> {
    let Some(event_id) = events::resolve_event_id(db, event_id).await? else {
        return Ok(BTreeMap::new());
    };

    let layout = EventLayout::load(db, event_id).await?;

    Ok(layout
        .sessions()
        .iter()
        .map(|s| {
            let views = layout
                .available_timeslots(Assignment::from(s))
                .into_iter()
                .map(TimeslotView::from)
                .collect();
            (s.session_id, views)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn track(track_id: i64, name: &str) -> Track {
        Track {
            track_id,
            event_id: 1,
            name: name.to_string(),
            room_number: format!("R{}", track_id),
        }
    }

    fn timeslot(timeslot_id: i64, hour: u32) -> Timeslot {
        let day = NaiveDate::from_ymd_opt(2024, 10, 5).unwrap();
        Timeslot {
            timeslot_id,
            event_id: 1,
            start_time: day.and_hms_opt(hour, 0, 0).unwrap(),
            end_time: day.and_hms_opt(hour, 50, 0).unwrap(),
            contains_no_sessions: false,
        }
    }

    fn session(session_id: i64, track_id: Option<i64>, timeslot_id: Option<i64>) -> Session {
        Session {
            session_id,
            event_id: 1,
            name: format!("Session {}", session_id),
            description: String::new(),
            skill_level: 1,
            keywords: String::new(),
            is_approved: true,
            track_id,
            timeslot_id,
        }
    }

    fn ids<T, F: Fn(&T) -> i64>(items: &[&T], f: F) -> Vec<i64> {
        items.iter().map(|&i| f(i)).collect()
    }

    #[test]
    fn test_full_track_excluded_unless_current() {
        let layout = EventLayout::from_parts(
            vec![track(1, "Cloud"), track(2, "Data")],
            vec![timeslot(10, 9), timeslot(11, 10)],
            vec![session(1, Some(1), Some(10)), session(2, Some(1), Some(11))],
        );

        let open = layout.available_tracks(Assignment::default());
        assert_eq!(ids(&open, |t| t.track_id), vec![2]);

        let on_cloud = Assignment {
            track_id: Some(1),
            timeslot_id: Some(10),
        };
        assert_eq!(ids(&layout.available_tracks(on_cloud), |t| t.track_id), vec![1, 2]);
    }

    #[test]
    fn test_duplicate_timeslots_count_once() {
        // Two sessions sharing one slot leave the other slot open
        let layout = EventLayout::from_parts(
            vec![track(1, "Cloud")],
            vec![timeslot(10, 9), timeslot(11, 10)],
            vec![session(1, Some(1), Some(10)), session(2, Some(1), Some(10))],
        );

        assert_eq!(layout.available_tracks(Assignment::default()).len(), 1);
    }

    #[test]
    fn test_event_without_timeslots_has_no_open_tracks() {
        let layout = EventLayout::from_parts(vec![track(1, "Cloud")], vec![], vec![]);
        assert!(layout.available_tracks(Assignment::default()).is_empty());
    }

    #[test]
    fn test_tracks_sorted_by_name_then_id() {
        let layout = EventLayout::from_parts(
            vec![track(3, "beta"), track(2, "Alpha"), track(1, "Alpha")],
            vec![timeslot(10, 9)],
            vec![],
        );

        // Byte order puts uppercase before lowercase
        let open = layout.available_tracks(Assignment::default());
        assert_eq!(ids(&open, |t| t.track_id), vec![1, 2, 3]);
    }

    #[test]
    fn test_timeslots_on_current_track() {
        let layout = EventLayout::from_parts(
            vec![track(1, "Cloud"), track(2, "Data")],
            vec![timeslot(12, 11), timeslot(10, 9), timeslot(11, 10)],
            vec![
                session(1, Some(1), Some(10)),
                session(2, Some(1), Some(11)),
                session(3, Some(2), Some(12)),
            ],
        );

        let current = Assignment {
            track_id: Some(1),
            timeslot_id: Some(10),
        };
        let open = layout.available_timeslots(current);
        assert_eq!(ids(&open, |t| t.timeslot_id), vec![10, 12]);
    }

    #[test]
    fn test_no_current_track_sees_all_timeslots() {
        let layout = EventLayout::from_parts(
            vec![track(1, "Cloud")],
            vec![timeslot(10, 9), timeslot(11, 10)],
            vec![session(1, Some(1), Some(10))],
        );

        let open = layout.available_timeslots(Assignment::default());
        assert_eq!(ids(&open, |t| t.timeslot_id), vec![10, 11]);
    }

    #[test]
    fn test_session_without_timeslot_does_not_occupy() {
        let layout = EventLayout::from_parts(
            vec![track(1, "Cloud")],
            vec![timeslot(10, 9)],
            vec![session(1, Some(1), None)],
        );

        assert_eq!(layout.available_tracks(Assignment::default()).len(), 1);
    }
}
