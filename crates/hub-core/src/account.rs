use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Profile;
use crate::enums::Role;

/// An authenticated visitor of the hub.
///
/// Produced by `hub-auth` (identity collaborator + session bridge), consumed by
/// `hub-app` (router, console) and `hub-cli`. Contains only data fields; no
/// identity-provider calls.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Account {
    /// Opaque identifier assigned by the identity collaborator.
    pub id: String,
    /// Display name, mutable by the owner.
    pub name: String,
    /// Unique per account (enforced by the identity collaborator).
    pub email: String,
    pub role: Role,
    /// `false` until the identity collaborator confirms ownership of `email`.
    pub email_verified: bool,
    pub avatar: Option<String>,
}

impl Account {
    /// A freshly created account: `user` role, unverified, no avatar.
    #[must_use]
    pub fn newly_created(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: Role::User,
            email_verified: false,
            avatar: None,
        }
    }

    /// Overlay the fields owned by the private profile document.
    ///
    /// Identity-owned fields (`id`, `email`, `email_verified`) are kept.
    #[must_use]
    pub fn with_profile(mut self, profile: &Profile) -> Self {
        if !profile.name.trim().is_empty() {
            self.name.clone_from(&profile.name);
        }
        self.role = profile.role;
        self.avatar.clone_from(&profile.avatar);
        self
    }

    /// Whether this account may open the developer console.
    #[must_use]
    pub const fn can_use_console(&self) -> bool {
        self.email_verified && matches!(self.role, Role::Developer)
    }

    /// Name to greet the visitor with.
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "there"
        } else {
            &self.name
        }
    }
}

/// Fallback display name derived from an email address (its local part).
#[must_use]
pub fn name_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_string()
}
