//! Row parsing helpers.
//!
//! Columns are read by index from `libsql::Row`. Timestamps written by the
//! repos are RFC 3339, while column defaults use `SQLite`'s `datetime('now')`
//! format, so both are accepted.

use chrono::{DateTime, Utc};

use crate::error::StoreError;

/// Parse a TEXT column as `DateTime<Utc>`.
///
/// # Errors
///
/// Returns `StoreError::Query` if the string is neither RFC 3339 nor
/// `"%Y-%m-%d %H:%M:%S"`.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a TEXT column into a `snake_case` serde enum such as `Role`.
///
/// # Errors
///
/// Returns `StoreError::Query` if the string does not match any variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, StoreError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| StoreError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. SQL NULL and `""` both map to `None`.
///
/// # Errors
///
/// Returns `StoreError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, StoreError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Decode the JSON tag array stored in `projects.tags`.
///
/// # Errors
///
/// Returns `StoreError::Query` on malformed JSON.
pub fn parse_tags(s: &str) -> Result<Vec<String>, StoreError> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(s).map_err(|e| StoreError::Query(format!("Invalid tags JSON '{s}': {e}")))
}

/// Encode tags for `projects.tags`.
///
/// # Errors
///
/// Returns `StoreError::Query` if serialization fails.
pub fn encode_tags(tags: &[String]) -> Result<String, StoreError> {
    serde_json::to_string(tags).map_err(|e| StoreError::Query(format!("Failed to encode tags: {e}")))
}
