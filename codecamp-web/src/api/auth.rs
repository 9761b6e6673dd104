//! Authentication middleware for write endpoints
//!
//! Request bodies carry `timestamp` and `hash`; see
//! [`codecamp_common::api::auth`] for the hash algorithm.

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use codecamp_common::api::auth::{validate_hash, validate_timestamp, ApiAuthError};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct AuthFields {
    timestamp: i64,
    hash: String,
}

/// Validate timestamp and hash, then hand the untouched body downstream
///
/// A shared secret of 0 disables the check entirely.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.shared_secret == 0 {
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, state.body_limit())
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read body: {}", e)))?;

    let json_value: Value = serde_json::from_slice(&body_bytes)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON: {}", e)))?;

    let auth_fields: AuthFields = serde_json::from_value(json_value.clone())
        .map_err(|e| ApiError::BadRequest(format!("Missing auth fields: {}", e)))?;

    validate_timestamp(auth_fields.timestamp, state.auth_window_ms).map_err(|e| match e {
        ApiAuthError::InvalidTimestamp { reason, .. } => {
            warn!("Rejected {} {}: {}", parts.method, parts.uri, reason);
            ApiError::Unauthorized(format!("Invalid timestamp: {}", reason))
        }
        _ => ApiError::Internal(format!("Authentication error: {}", e)),
    })?;

    validate_hash(&auth_fields.hash, &json_value, state.shared_secret).map_err(|e| match e {
        ApiAuthError::InvalidHash { provided, calculated } => {
            warn!(
                "Hash validation failed for {} {}: provided={}, calculated={}",
                parts.method, parts.uri, provided, calculated
            );
            ApiError::Unauthorized("Invalid hash".to_string())
        }
        _ => ApiError::Internal(format!("Authentication error: {}", e)),
    })?;

    let request = Request::from_parts(parts, Body::from(body_bytes));
    Ok(next.run(request).await)
}
