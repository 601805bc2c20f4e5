//! Error types for hub-app.

use hub_core::CoreError;
use hub_core::enums::ProjectStatus;
use hub_core::validation::ProjectValidationErrors;
use hub_store::error::StoreError;
use thiserror::Error;

/// Errors from the developer console.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("not signed in; run `hub auth login`")]
    NotSignedIn,

    #[error("verify your email address before opening the console")]
    NotVerified,

    #[error("the console is for developers; run `hub profile upgrade` first")]
    NotDeveloper,

    /// Another console mutation is still in flight.
    #[error("another change is still being saved")]
    Busy,

    #[error("invalid project: {0}")]
    Validation(ProjectValidationErrors),

    #[error("project {id} belongs to another account")]
    NotOwner { id: String },

    #[error("project not found: {id}")]
    NotFound { id: String },

    #[error("an update needs the id of the project to change")]
    MissingId,

    #[error("cannot move a {from} project to {to}")]
    InvalidStatusChange { from: ProjectStatus, to: ProjectStatus },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Errors from application-session operations.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not signed in; run `hub auth login`")]
    NotSignedIn,

    #[error(transparent)]
    Store(#[from] StoreError),
}
