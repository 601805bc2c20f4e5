//! The identity collaborator port.
//!
//! Everything the auth flow and the session bridge need from an identity
//! provider goes through [`IdentityProvider`]. The production adapter is
//! [`RestIdentityProvider`](crate::rest::RestIdentityProvider); tests use
//! `memory::InMemoryIdentity`.

use async_trait::async_trait;
use hub_core::Account;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::AuthError;

/// How an email address is known to the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistenceStatus {
    /// No account uses this email.
    New,
    /// An account with a password exists.
    Exists,
    /// The account signs in only through the federated (Google) provider.
    GoogleOnly,
}

impl ExistenceStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Exists => "exists",
            Self::GoogleOnly => "google_only",
        }
    }
}

/// The identity-owned half of a signed-in account.
///
/// Role, avatar and an edited name live in the profile document; the session
/// bridge merges the two into an [`Account`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySession {
    pub account_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub email_verified: bool,
}

impl IdentitySession {
    /// Name to fall back on when no profile document carries one.
    #[must_use]
    pub fn fallback_name(&self) -> String {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| hub_core::account::name_from_email(&self.email), str::to_string)
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn check_existence(&self, email: &str) -> Result<ExistenceStatus, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, AuthError>;

    /// Create an account and send the verification message. The new account
    /// is unverified; callers must not treat registration as a sign-in.
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), AuthError>;

    /// Federated (Google) sign-in. Creates the profile document if missing.
    async fn sign_in_federated(&self) -> Result<Account, AuthError>;

    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError>;

    /// Re-send the verification message for the current session.
    async fn resend_verification(&self) -> Result<(), AuthError>;

    /// Re-read the current session's account, picking up a fresh
    /// verification flag.
    async fn reload_account(&self) -> Result<Account, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Stream of session changes: `Some` on sign-in or refresh, `None` on
    /// sign-out.
    fn session_changes(&self) -> broadcast::Receiver<Option<IdentitySession>>;

    fn current_session(&self) -> Option<IdentitySession>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(display_name: Option<&str>) -> IdentitySession {
        IdentitySession {
            account_id: "acc-1".into(),
            email: "ada@example.com".into(),
            display_name: display_name.map(str::to_string),
            email_verified: false,
        }
    }

    #[test]
    fn fallback_name_prefers_display_name() {
        assert_eq!(session(Some("Ada Lovelace")).fallback_name(), "Ada Lovelace");
        assert_eq!(session(Some("  ")).fallback_name(), "ada");
        assert_eq!(session(None).fallback_name(), "ada");
    }
}
