//! API authentication via timestamp and hash validation
//!
//! Write requests carry `timestamp` (Unix epoch ms) and `hash` (SHA-256 hex)
//! in their JSON body:
//! - Timestamp must be within the configured window in the past and at most
//!   [`MAX_FUTURE_SKEW_MS`] in the future
//! - Hash is calculated from canonical JSON + shared secret
//! - Shared secret is stored in the `settings` table
//! - A shared secret of 0 disables authentication

use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[cfg(feature = "sqlx")]
use sqlx::SqlitePool;

/// Largest accepted clock drift into the future, in milliseconds
pub const MAX_FUTURE_SKEW_MS: i64 = 1;

const DUMMY_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Authentication error types
#[derive(Debug, Clone, Error)]
pub enum ApiAuthError {
    /// Timestamp outside acceptable window
    #[error("Invalid timestamp: {reason}")]
    InvalidTimestamp {
        timestamp: i64,
        now: i64,
        reason: String,
    },

    /// Hash does not match calculated value
    #[error("Invalid hash")]
    InvalidHash { provided: String, calculated: String },

    /// Database error loading shared secret
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Load shared secret from database settings
///
/// Key `api_shared_secret`, value parsed as i64. A missing row is initialized
/// with a fresh random secret.
#[cfg(feature = "sqlx")]
pub async fn load_shared_secret(db: &SqlitePool) -> Result<i64, ApiAuthError> {
    let result: Option<(Option<String>,)> =
        sqlx::query_as("SELECT value FROM settings WHERE key = 'api_shared_secret'")
            .fetch_optional(db)
            .await
            .map_err(|e| ApiAuthError::DatabaseError(e.to_string()))?;

    match result {
        Some((Some(value),)) => value
            .parse::<i64>()
            .map_err(|e| ApiAuthError::DatabaseError(format!("Invalid i64: {}", e))),
        _ => initialize_shared_secret(db).await,
    }
}

/// Generate a random non-zero secret and store it
#[cfg(feature = "sqlx")]
pub async fn initialize_shared_secret(db: &SqlitePool) -> Result<i64, ApiAuthError> {
    use rand::Rng;

    let secret: i64 = {
        let mut rng = rand::thread_rng();
        loop {
            let val = rng.gen::<i64>();
            if val != 0 {
                break val;
            }
        }
    };

    sqlx::query(
        "INSERT OR REPLACE INTO settings (key, value, updated_at)
         VALUES ('api_shared_secret', ?, CURRENT_TIMESTAMP)",
    )
    .bind(secret.to_string())
    .execute(db)
    .await
    .map_err(|e| ApiAuthError::DatabaseError(e.to_string()))?;

    tracing::info!("Generated new API shared secret");
    Ok(secret)
}

/// Validate timestamp against the current wall clock
pub fn validate_timestamp(timestamp: i64, window_ms: i64) -> Result<(), ApiAuthError> {
    validate_timestamp_at(timestamp, chrono::Utc::now().timestamp_millis(), window_ms)
}

/// Validate timestamp against an explicit `now`
///
/// # Examples
///
/// ```
/// use codecamp_common::api::auth::validate_timestamp_at;
///
/// let now = 1_730_000_000_000;
/// assert!(validate_timestamp_at(now - 500, now, 1000).is_ok());
/// assert!(validate_timestamp_at(now - 2000, now, 1000).is_err());
/// assert!(validate_timestamp_at(now + 100, now, 1000).is_err());
/// ```
pub fn validate_timestamp_at(timestamp: i64, now: i64, window_ms: i64) -> Result<(), ApiAuthError> {
    let Some(diff) = now.checked_sub(timestamp) else {
        return Err(ApiAuthError::InvalidTimestamp {
            timestamp,
            now,
            reason: format!("Timestamp {} out of range", timestamp),
        });
    };

    if diff > window_ms {
        return Err(ApiAuthError::InvalidTimestamp {
            timestamp,
            now,
            reason: format!("Timestamp {}ms too old (max {}ms past)", diff, window_ms),
        });
    }

    if diff < -MAX_FUTURE_SKEW_MS {
        return Err(ApiAuthError::InvalidTimestamp {
            timestamp,
            now,
            reason: format!(
                "Timestamp {}ms in future (max {}ms future)",
                diff.unsigned_abs(),
                MAX_FUTURE_SKEW_MS
            ),
        });
    }

    Ok(())
}

/// Calculate the request hash
///
/// 1. Replace the `hash` field with 64 zeros
/// 2. Convert to canonical JSON (sorted keys, no whitespace)
/// 3. Append the shared secret as a decimal string
/// 4. SHA-256, rendered as 64 hex characters
pub fn calculate_hash(json_value: &Value, shared_secret: i64) -> String {
    let mut value = json_value.clone();
    if let Some(obj) = value.as_object_mut() {
        obj.insert("hash".to_string(), Value::String(DUMMY_HASH.to_string()));
    }

    let to_hash = format!("{}{}", to_canonical_json(&value), shared_secret);

    let mut hasher = Sha256::new();
    hasher.update(to_hash.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Convert JSON to canonical form (sorted keys, no whitespace)
///
/// # Examples
///
/// ```
/// use codecamp_common::api::auth::to_canonical_json;
/// use serde_json::json;
///
/// let canonical = to_canonical_json(&json!({"z": 3, "a": [1, true], "m": null}));
/// assert_eq!(canonical, r#"{"a":[1,true],"m":null,"z":3}"#);
/// ```
pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<_> = map.iter().collect();
            pairs.sort_by_key(|(k, _)| *k);
            let items: Vec<String> = pairs
                .into_iter()
                .map(|(k, v)| format!("\"{}\":{}", k, to_canonical_json(v)))
                .collect();
            format!("{{{}}}", items.join(","))
        }
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::String(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
    }
}

/// Validate hash matches calculated value
pub fn validate_hash(
    provided_hash: &str,
    json_value: &Value,
    shared_secret: i64,
) -> Result<(), ApiAuthError> {
    let calculated = calculate_hash(json_value, shared_secret);

    if provided_hash != calculated {
        return Err(ApiAuthError::InvalidHash {
            provided: provided_hash.to_string(),
            calculated,
        });
    }

    Ok(())
}

/// Add `timestamp` and a matching `hash` to a JSON request body
///
/// Client-side counterpart of [`validate_hash`]. Non-object values are
/// returned unchanged.
pub fn sign_request(mut body: Value, shared_secret: i64, timestamp: i64) -> Value {
    if let Some(obj) = body.as_object_mut() {
        obj.insert("timestamp".to_string(), Value::from(timestamp));
        obj.insert("hash".to_string(), Value::String(DUMMY_HASH.to_string()));
    } else {
        return body;
    }

    let hash = calculate_hash(&body, shared_secret);
    if let Some(obj) = body.as_object_mut() {
        obj.insert("hash".to_string(), Value::String(hash));
    }
    body
}
