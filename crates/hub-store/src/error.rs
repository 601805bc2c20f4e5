//! Storage error types for hub-store.

use thiserror::Error;

/// Errors from project and profile storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A SQL query failed or returned malformed data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// The addressed record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A record with the same id already exists.
    #[error("{kind} already exists: {id}")]
    Conflict { kind: &'static str, id: String },

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}
