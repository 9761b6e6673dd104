//! Display records for tracks and timeslots

use chrono::NaiveDateTime;
use codecamp_common::db::{Timeslot, Track};
use serde::Serialize;

const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackView {
    pub track_id: i64,
    pub name: String,
    pub room_number: String,
    /// `"{name} ({room})"`
    pub label: String,
}

impl From<&Track> for TrackView {
    fn from(track: &Track) -> Self {
        Self {
            track_id: track.track_id,
            name: track.name.clone(),
            room_number: track.room_number.clone(),
            label: track_label(&track.name, &track.room_number),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeslotView {
    pub timeslot_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub contains_no_sessions: bool,
    /// `"HH:MM:SS - HH:MM:SS"`
    pub label: String,
}

impl From<&Timeslot> for TimeslotView {
    fn from(timeslot: &Timeslot) -> Self {
        Self {
            timeslot_id: timeslot.timeslot_id,
            start_time: timeslot.start_time,
            end_time: timeslot.end_time,
            contains_no_sessions: timeslot.contains_no_sessions,
            label: timeslot_label(timeslot.start_time, timeslot.end_time),
        }
    }
}

pub fn track_label(name: &str, room_number: &str) -> String {
    format!("{} ({})", name, room_number)
}

pub fn timeslot_label(start: NaiveDateTime, end: NaiveDateTime) -> String {
    format!("{} - {}", start.format(TIME_FORMAT), end.format(TIME_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_track_label() {
        let track = Track {
            track_id: 1,
            event_id: 1,
            name: "Cloud".to_string(),
            room_number: "B-104".to_string(),
        };
        assert_eq!(TrackView::from(&track).label, "Cloud (B-104)");
        assert_eq!(track_label("Keynote", ""), "Keynote ()");
    }

    #[test]
    fn test_timeslot_label_uses_24_hour_clock() {
        let day = NaiveDate::from_ymd_opt(2024, 10, 5).unwrap();
        let timeslot = Timeslot {
            timeslot_id: 3,
            event_id: 1,
            start_time: day.and_hms_opt(9, 5, 0).unwrap(),
            end_time: day.and_hms_opt(13, 45, 30).unwrap(),
            contains_no_sessions: true,
        };

        let view = TimeslotView::from(&timeslot);
        assert_eq!(view.label, "09:05:00 - 13:45:30");
        assert!(view.contains_no_sessions);
    }
}
