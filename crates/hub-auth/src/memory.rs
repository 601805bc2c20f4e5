//! In-memory identity provider for tests.
//!
//! Behaves like the hosted provider for the operations the auth flow and the
//! bridge use: registration signs the new (unverified) account in, sign-in
//! and sign-out broadcast session changes, and every port call is logged so
//! tests can assert how many requests a transition issued.
//!
//! With [`InMemoryIdentity::with_profiles`] it also writes and reads profile
//! documents the way the REST adapter does. Without a store, returned
//! accounts carry the identity's own fields only.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use hub_core::Account;
use hub_store::ProfileStore;
use tokio::sync::broadcast;

use crate::error::AuthError;
use crate::provider::{ExistenceStatus, IdentityProvider, IdentitySession};
use crate::session::{ensure_profile, resolve_account};

#[derive(Debug, Clone)]
struct MemoryAccount {
    id: String,
    email: String,
    /// `None` for federated-only accounts.
    password: Option<String>,
    display_name: String,
    verified: bool,
}

impl MemoryAccount {
    fn session(&self) -> IdentitySession {
        IdentitySession {
            account_id: self.id.clone(),
            email: self.email.clone(),
            display_name: Some(self.display_name.clone()).filter(|n| !n.is_empty()),
            email_verified: self.verified,
        }
    }

    fn account(&self) -> Account {
        let session = self.session();
        let mut account = Account::newly_created(self.id.clone(), session.fallback_name(), self.email.clone());
        account.email_verified = self.verified;
        account
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: Vec<MemoryAccount>,
    current: Option<String>,
    federated_email: Option<String>,
    unavailable: bool,
    calls: Vec<&'static str>,
    verification_emails: usize,
    password_resets: Vec<String>,
}

impl MemoryState {
    fn find(&self, email: &str) -> Option<&MemoryAccount> {
        self.accounts.iter().find(|a| a.email.eq_ignore_ascii_case(email))
    }

    fn current(&self) -> Option<&MemoryAccount> {
        let id = self.current.as_deref()?;
        self.accounts.iter().find(|a| a.id == id)
    }

    fn insert(&mut self, email: &str, password: Option<&str>, name: &str, verified: bool) -> MemoryAccount {
        let account = MemoryAccount {
            id: format!("uid-{:04}", self.accounts.len() + 1),
            email: email.to_string(),
            password: password.map(str::to_string),
            display_name: name.to_string(),
            verified,
        };
        self.accounts.push(account.clone());
        account
    }
}

pub struct InMemoryIdentity {
    state: Mutex<MemoryState>,
    changes: broadcast::Sender<Option<IdentitySession>>,
    profiles: Option<Arc<dyn ProfileStore>>,
}

impl Default for InMemoryIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentity {
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            state: Mutex::new(MemoryState::default()),
            changes,
            profiles: None,
        }
    }

    /// Give sessions profile documents in `profiles` before they are
    /// broadcast.
    #[must_use]
    pub fn with_profiles(mut self, profiles: Arc<dyn ProfileStore>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    /// Ensure the profile exists, then resolve the account through it.
    async fn settle(&self, account: &MemoryAccount, name: Option<&str>) -> Account {
        let session = account.session();
        match &self.profiles {
            Some(profiles) => {
                ensure_profile(profiles.as_ref(), &session, name).await;
                resolve_account(profiles.as_ref(), &session).await
            }
            None => account.account(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a call and fail if the provider is marked unavailable.
    fn enter(&self, call: &'static str) -> Result<MutexGuard<'_, MemoryState>, AuthError> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.unavailable {
            return Err(AuthError::Api {
                status: 503,
                message: "UNAVAILABLE".into(),
            });
        }
        Ok(state)
    }

    fn broadcast(&self, session: Option<IdentitySession>) {
        // No receivers is fine.
        let _ = self.changes.send(session);
    }

    /// Add a password account; returns its id.
    pub fn add_account(&self, email: &str, password: &str, name: &str, verified: bool) -> String {
        self.lock().insert(email, Some(password), name, verified).id
    }

    /// Add a federated-only account; returns its id.
    pub fn add_google_account(&self, email: &str, name: &str) -> String {
        self.lock().insert(email, None, name, true).id
    }

    /// The account the next federated sign-in resolves to. Created verified
    /// on first use.
    pub fn set_federated_account(&self, email: &str) {
        self.lock().federated_email = Some(email.to_string());
    }

    /// Confirm the address, as clicking the verification link would.
    pub fn mark_verified(&self, email: &str) {
        let mut state = self.lock();
        if let Some(account) = state.accounts.iter_mut().find(|a| a.email.eq_ignore_ascii_case(email)) {
            account.verified = true;
        }
    }

    /// Make every subsequent call fail with a 503.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Port calls made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    #[must_use]
    pub fn verification_emails_sent(&self) -> usize {
        self.lock().verification_emails
    }

    #[must_use]
    pub fn password_resets(&self) -> Vec<String> {
        self.lock().password_resets.clone()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    async fn check_existence(&self, email: &str) -> Result<ExistenceStatus, AuthError> {
        let state = self.enter("check_existence")?;
        Ok(match state.find(email) {
            None => ExistenceStatus::New,
            Some(account) if account.password.is_some() => ExistenceStatus::Exists,
            Some(_) => ExistenceStatus::GoogleOnly,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let account = {
            let mut state = self.enter("sign_in")?;
            let account = state
                .find(email)
                .filter(|a| a.password.as_deref() == Some(password))
                .cloned()
                .ok_or(AuthError::InvalidCredential)?;
            state.current = Some(account.id.clone());
            account
        };
        let resolved = self.settle(&account, None).await;
        self.broadcast(Some(account.session()));
        Ok(resolved)
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), AuthError> {
        let account = {
            let mut state = self.enter("register")?;
            if state.find(email).is_some() {
                return Err(AuthError::EmailInUse);
            }
            let account = state.insert(email, Some(password), name, false);
            state.current = Some(account.id.clone());
            state.verification_emails += 1;
            account
        };
        self.settle(&account, Some(name)).await;
        self.broadcast(Some(account.session()));
        Ok(())
    }

    async fn sign_in_federated(&self) -> Result<Account, AuthError> {
        let account = {
            let mut state = self.enter("sign_in_federated")?;
            let email = state
                .federated_email
                .clone()
                .ok_or_else(|| AuthError::BrowserFlowFailed("sign-in window closed".into()))?;
            let account = match state.find(&email).cloned() {
                Some(account) => account,
                None => {
                    let name = hub_core::account::name_from_email(&email);
                    state.insert(&email, None, &name, true)
                }
            };
            state.current = Some(account.id.clone());
            account
        };
        let resolved = self.settle(&account, None).await;
        self.broadcast(Some(account.session()));
        Ok(resolved)
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let mut state = self.enter("request_password_reset")?;
        if state.find(email).is_none() {
            return Err(AuthError::InvalidCredential);
        }
        state.password_resets.push(email.to_string());
        Ok(())
    }

    async fn resend_verification(&self) -> Result<(), AuthError> {
        let mut state = self.enter("resend_verification")?;
        if state.current().is_none() {
            return Err(AuthError::NotAuthenticated);
        }
        state.verification_emails += 1;
        Ok(())
    }

    async fn reload_account(&self) -> Result<Account, AuthError> {
        let account = {
            let state = self.enter("reload_account")?;
            state.current().cloned().ok_or(AuthError::NotAuthenticated)?
        };
        let resolved = self.settle(&account, None).await;
        self.broadcast(Some(account.session()));
        Ok(resolved)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.enter("sign_out")?.current = None;
        self.broadcast(None);
        Ok(())
    }

    fn session_changes(&self) -> broadcast::Receiver<Option<IdentitySession>> {
        self.changes.subscribe()
    }

    fn current_session(&self) -> Option<IdentitySession> {
        self.lock().current().map(MemoryAccount::session)
    }
}
