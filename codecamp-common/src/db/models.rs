//! Database models
//!
//! Row structs for the tables read whole. Optional foreign keys are `Option<i64>`: a
//! session without a track has `track_id: None`.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub event_id: i64,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Track {
    pub track_id: i64,
    pub event_id: i64,
    pub name: String,
    pub room_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Timeslot {
    pub timeslot_id: i64,
    pub event_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Break or lunch slot that intentionally holds no sessions
    pub contains_no_sessions: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub session_id: i64,
    pub event_id: i64,
    pub name: String,
    pub description: String,
    pub skill_level: i64,
    pub keywords: String,
    pub is_approved: bool,
    pub track_id: Option<i64>,
    pub timeslot_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Announcement {
    pub announcement_id: i64,
    /// `None` for announcements shown regardless of event
    pub event_id: Option<i64>,
    pub message: String,
    /// Display order, lowest first
    pub rank: i64,
    pub publish_on: NaiveDate,
    pub expires_on: Option<NaiveDate>,
}

/// Generate a new user identifier
pub fn new_user_id() -> String {
    Uuid::new_v4().to_string()
}
