//! Application session: the explicit context object the front end holds.
//!
//! [`AppSession`] owns the [`SessionBridge`] and keeps the latest account and
//! the forced auth step in sync with it through a bridge subscription.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use hub_auth::{AuthFlow, AuthFlowState, AuthStep, IdentityProvider, SessionBridge, Subscription};
use hub_core::account::Account;
use hub_core::entities::{Profile, Project};
use hub_core::enums::Role;
use hub_store::error::StoreError;
use hub_store::{ProfileStore, ProjectStore};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::catalogue;
use crate::console::Console;
use crate::error::{AppError, ConsoleError};
use crate::router::{self, Route, View};

#[derive(Debug, Default)]
struct SessionState {
    account: Option<Account>,
    forced_step: Option<AuthStep>,
}

impl SessionState {
    fn apply(&mut self, account: Option<&Account>) {
        self.forced_step = match account {
            Some(acc) if !acc.email_verified => Some(AuthStep::VerifyEmail),
            _ => None,
        };
        self.account = account.cloned();
    }
}

pub struct AppSession {
    identity: Arc<dyn IdentityProvider>,
    projects: Arc<dyn ProjectStore>,
    profiles: Arc<dyn ProfileStore>,
    state: Arc<Mutex<SessionState>>,
    _subscription: Subscription,
    bridge: SessionBridge,
}

impl AppSession {
    /// Start the bridge and subscribe to it.
    pub async fn start(
        identity: Arc<dyn IdentityProvider>,
        projects: Arc<dyn ProjectStore>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        let bridge = SessionBridge::start(Arc::clone(&identity), Arc::clone(&profiles)).await;
        let state = Arc::new(Mutex::new(SessionState::default()));
        let sink = Arc::clone(&state);
        let subscription = bridge.subscribe(move |account| {
            sink.lock().unwrap_or_else(PoisonError::into_inner).apply(account);
        });
        Self {
            identity,
            projects,
            profiles,
            state,
            _subscription: subscription,
            bridge,
        }
    }

    #[must_use]
    pub fn account(&self) -> Option<Account> {
        self.lock().account.clone()
    }

    /// `Some(VerifyEmail)` while the signed-in account is unverified.
    #[must_use]
    pub fn forced_auth_step(&self) -> Option<AuthStep> {
        self.lock().forced_step
    }

    #[must_use]
    pub fn route(&self, view: &View) -> Route {
        router::route(view, self.lock().account.as_ref())
    }

    /// A receiver holding the latest account.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Option<Account>> {
        self.bridge.watch()
    }

    /// Auth wizard starting where the current session requires.
    #[must_use]
    pub fn auth_flow(&self) -> AuthFlow<dyn IdentityProvider> {
        let state = AuthFlowState::for_session(self.lock().account.as_ref());
        AuthFlow::new(Arc::clone(&self.identity), state)
    }

    /// Re-resolve the account after an out-of-band change such as email
    /// verification.
    pub async fn refresh(&self) {
        self.bridge.refresh().await;
    }

    /// Sign out through the identity provider.
    ///
    /// The bridge is re-resolved before returning so [`account`](Self::account)
    /// is already `None`; subscribers still hear the sign-out once.
    ///
    /// # Errors
    ///
    /// Returns the provider's error.
    pub async fn sign_out(&self) -> Result<(), hub_auth::AuthError> {
        self.identity.sign_out().await?;
        self.bridge.refresh().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn apps(&self, featured_only: bool) -> Result<Vec<Project>, StoreError> {
        catalogue::list_apps(self.projects.as_ref(), featured_only).await
    }

    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn app_details(&self, id: &str) -> Result<Option<Project>, StoreError> {
        catalogue::app_details(self.projects.as_ref(), id).await
    }

    /// Open the developer console for the signed-in account.
    ///
    /// # Errors
    ///
    /// `NotSignedIn` without a session, otherwise as [`Console::open`].
    pub async fn open_console(&self) -> Result<Console<dyn ProjectStore>, ConsoleError> {
        let account = self.account().ok_or(ConsoleError::NotSignedIn)?;
        Console::open(Arc::clone(&self.projects), &account).await
    }

    /// Grant the signed-in account the developer role and return the
    /// re-resolved account. Already-developer accounts are returned as is.
    ///
    /// # Errors
    ///
    /// `NotSignedIn` without a session; `Store` if the profile write fails.
    pub async fn upgrade_to_developer(&self) -> Result<Account, AppError> {
        let account = self.account().ok_or(AppError::NotSignedIn)?;
        if !account.role.can_upgrade_to(Role::Developer) {
            debug!(id = %account.id, "already a developer");
            return Ok(account);
        }

        let profile = match self.profiles.get_profile(&account.id).await? {
            Some(existing) => Profile {
                role: Role::Developer,
                ..existing
            },
            None => Profile {
                account_id: account.id.clone(),
                name: account.name.clone(),
                role: Role::Developer,
                avatar: account.avatar.clone(),
                created_at: Utc::now(),
            },
        };
        self.profiles.put_profile(&profile).await?;
        info!(id = %account.id, "upgraded to developer");

        self.bridge.refresh().await;
        self.account().ok_or(AppError::NotSignedIn)
    }

    /// Stop the bridge listener.
    pub fn shutdown(&self) {
        self.bridge.shutdown();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
