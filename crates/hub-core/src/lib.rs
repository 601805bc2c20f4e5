//! # hub-core
//!
//! Core types, validation, and error types for AfroTech Hub.
//!
//! This crate provides the foundational types shared across all hub crates:
//! - `Account` and `Profile` (the authenticated visitor and its private profile document)
//! - `Project` listings and the `ProjectDraft` validation used by the developer console
//! - Role, project status, and chat role enums
//! - ID generation helpers
//! - The seed catalogue and site copy shown on the home sections
//! - Cross-cutting error types

pub mod account;
pub mod catalogue;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod validation;

pub use account::Account;
pub use errors::CoreError;
