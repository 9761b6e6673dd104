//! HTTP API handlers for codecamp-web

pub mod announcements;
pub mod auth;
pub mod buildinfo;
pub mod error;
pub mod events;
pub mod health;
pub mod schedule;
pub mod sessions;
pub mod speakers;

pub use announcements::{create_announcement, list_announcements};
pub use auth::auth_middleware;
pub use buildinfo::get_build_info;
pub use error::ApiError;
pub use events::{activate_event, get_active_event, EventQuery};
pub use health::health_routes;
pub use schedule::{
    get_active_schedule, get_available_timeslot_options, get_available_timeslots,
    get_available_track_options, get_available_tracks, get_event_schedule,
    get_timeslot_options_by_session, get_track_options_by_session,
};
pub use sessions::{assign_session, get_session};
pub use speakers::{get_speaker, get_speaker_image, list_speakers, update_speaker};
