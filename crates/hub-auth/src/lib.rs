//! # hub-auth
//!
//! Authentication for AfroTech Hub.
//!
//! - [`provider`]: the identity collaborator port ([`IdentityProvider`])
//! - [`rest`]: the Identity Toolkit REST adapter, with federated sign-in
//!   through a localhost browser callback ([`browser_flow`]) and refresh
//!   tokens kept in the OS keychain ([`token_store`])
//! - [`flow`]: the sign-in/registration wizard as a pure transition function
//!   plus an async driver
//! - [`session`]: the bridge from session changes to the current `Account`

pub mod browser_flow;
pub mod error;
pub mod flow;
mod http;
pub mod provider;
pub mod rest;
pub mod session;
pub mod token_store;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

pub use error::{AuthError, AuthErrorKind};
pub use flow::{AuthEvent, AuthFlow, AuthFlowState, AuthStep};
pub use provider::{ExistenceStatus, IdentityProvider, IdentitySession};
pub use rest::RestIdentityProvider;
pub use session::{SessionBridge, Subscription};

/// Clear stored credentials without a live provider (e.g. when the identity
/// section is not configured).
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if the credentials file cannot be removed.
pub fn forget_credentials() -> Result<(), AuthError> {
    token_store::delete()
}
