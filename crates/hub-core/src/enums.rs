//! Role, project status, and chat role enums for AfroTech Hub.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Enums with a lifecycle provide `allowed_next_states()` (or the role
//! equivalent) so the application layer can reject invalid changes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Account role.
///
/// ```text
/// user → developer
/// ```
///
/// Roles only move upward; nothing in the hub downgrades a developer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Developer,
}

impl Role {
    /// Check whether moving from `self` to `next` is an allowed upgrade.
    ///
    /// Staying on the same role is not an upgrade.
    #[must_use]
    pub const fn can_upgrade_to(self, next: Self) -> bool {
        matches!((self, next), (Self::User, Self::Developer))
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Developer => "developer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "developer" => Ok(Self::Developer),
            other => Err(CoreError::UnknownVariant {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

/// Publication status of a project listing.
///
/// ```text
/// draft → in_review → published
///       ↖───────────┘     │
///       ↖─────────────────┘ (unpublish)
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Draft,
    InReview,
    Published,
}

impl ProjectStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::InReview, Self::Published],
            Self::InReview => &[Self::Draft, Self::Published],
            Self::Published => &[Self::Draft],
        }
    }

    /// Check whether transitioning to `next` is allowed. Keeping the same
    /// status is always allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next || self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InReview => "in_review",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "in_review" => Ok(Self::InReview),
            "published" => Ok(Self::Published),
            other => Err(CoreError::UnknownVariant {
                kind: "project status",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// ChatRole
// ---------------------------------------------------------------------------

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
