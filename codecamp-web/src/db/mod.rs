//! Database access layer for codecamp-web
//!
//! Thin query functions over `SqlitePool`. Functions named `get_*` return
//! `Ok(None)` for a missing row; callers decide whether that is a 404 or a
//! lenient default.

pub mod announcements;
pub mod events;
pub mod layout;
pub mod sessions;
pub mod speakers;
