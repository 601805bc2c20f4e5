//! Cross-cutting error types for AfroTech Hub.
//!
//! This module defines errors that can originate from any crate in the system.
//! Collaborator-specific errors (e.g., `AuthError`, `StoreError`) are defined in
//! their respective crates and converge into `anyhow` inside `hub-cli`.

use thiserror::Error;

/// Errors that can be raised by any hub crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// A stored value could not be mapped back to a known variant.
    #[error("Unknown {kind} value: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Random ID generation failed.
    #[error("ID generation failed: {0}")]
    IdGeneration(String),
}
