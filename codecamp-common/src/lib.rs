//! # Codecamp Common Library
//!
//! Shared code for the Codecamp event service:
//! - Database schema, initialization and row models
//! - API authentication primitives (shared secret, timestamp + hash)
//! - Bootstrap configuration loading and root folder resolution
//! - Common error type

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod skill_level;

pub use error::{Error, Result};
pub use skill_level::SkillLevel;
