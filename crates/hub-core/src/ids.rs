//! ID prefix constants and generation helpers.
//!
//! IDs are `{prefix}-{8 hex chars}` (e.g., `app-a3f8b2c1`), matching the
//! format the store has always produced for listings.

use crate::errors::CoreError;

pub const PREFIX_PROJECT: &str = "app";

/// Generate a prefixed random ID.
///
/// # Errors
///
/// Returns `CoreError::IdGeneration` if the OS random source is unavailable.
pub fn generate(prefix: &str) -> Result<String, CoreError> {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes).map_err(|e| CoreError::IdGeneration(e.to_string()))?;
    let suffix: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("{prefix}-{suffix}"))
}

/// Check that `id` has the `{prefix}-{8 hex}` shape.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| hex.len() == 8 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
