//! Schedule business logic
//!
//! Availability of tracks and timeslots for session assignment, and the
//! assembled schedule of an event.

pub mod assembler;
pub mod availability;
pub mod view;

pub use assembler::{build_active_schedule, build_schedule, ScheduleEntry};
pub use availability::{
    available_timeslot_views, available_timeslots, available_track_views, available_tracks,
    timeslot_options_by_session, track_options_by_session, Assignment, EventLayout,
};
pub use view::{TimeslotView, TrackView};
