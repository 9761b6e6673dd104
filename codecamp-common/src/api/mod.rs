//! Shared HTTP API functionality
//!
//! Contains ONLY pure functions, database operations and shared types. The
//! axum middleware that applies them lives in `codecamp-web`.

pub mod auth;

pub use auth::{
    calculate_hash, sign_request, to_canonical_json, validate_hash, validate_timestamp,
    validate_timestamp_at, ApiAuthError, MAX_FUTURE_SKEW_MS,
};

#[cfg(feature = "sqlx")]
pub use auth::{initialize_shared_secret, load_shared_secret};
