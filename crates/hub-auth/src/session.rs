//! Session/profile bridge.
//!
//! Turns the identity provider's session-change stream into a single
//! current-[`Account`] value. Consumers either register a callback with
//! [`SessionBridge::subscribe`] or poll a [`watch`] receiver.
//!
//! On every change the bridge fetches the private profile document. When the
//! session exists but no profile document does, the account is treated as
//! newly created: role `user`, unverified. Providers write that document with
//! [`ensure_profile`] before announcing a session, so the fallback only
//! applies when the store itself is failing.
//!
//! Subscribers hear each distinct account value once: re-publishing an
//! unchanged account is a no-op.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use chrono::Utc;
use hub_core::Account;
use hub_core::entities::Profile;
use hub_core::enums::Role;
use hub_store::ProfileStore;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::provider::{IdentityProvider, IdentitySession};

type Callback = Arc<dyn Fn(Option<&Account>) + Send + Sync>;

/// Merge an identity session with its profile document.
///
/// A missing profile, or a failed lookup, yields a newly created account.
pub async fn resolve_account(profiles: &dyn ProfileStore, session: &IdentitySession) -> Account {
    let profile = match profiles.get_profile(&session.account_id).await {
        Ok(profile) => profile,
        Err(error) => {
            tracing::warn!(account = %session.account_id, %error, "profile lookup failed; treating as new account");
            None
        }
    };

    match profile {
        Some(profile) => {
            let mut account = Account::newly_created(
                session.account_id.clone(),
                session.fallback_name(),
                session.email.clone(),
            )
            .with_profile(&profile);
            account.email_verified = session.email_verified;
            account
        }
        None => Account::newly_created(
            session.account_id.clone(),
            session.fallback_name(),
            session.email.clone(),
        ),
    }
}

/// Create the profile document for `session` if it has none.
///
/// Failures are logged and swallowed; the bridge then falls back to a newly
/// created account.
pub async fn ensure_profile(profiles: &dyn ProfileStore, session: &IdentitySession, name: Option<&str>) {
    let missing = match profiles.get_profile(&session.account_id).await {
        Ok(profile) => profile.is_none(),
        Err(error) => {
            tracing::warn!(account = %session.account_id, %error, "profile lookup failed");
            return;
        }
    };
    if !missing {
        return;
    }
    let profile = Profile {
        account_id: session.account_id.clone(),
        name: name.map_or_else(|| session.fallback_name(), str::to_string),
        role: Role::User,
        avatar: None,
        created_at: Utc::now(),
    };
    match profiles.put_profile(&profile).await {
        Ok(()) => tracing::debug!(account = %session.account_id, "profile created"),
        Err(error) => tracing::warn!(account = %session.account_id, %error, "could not create profile"),
    }
}

struct BridgeInner {
    current: watch::Sender<Option<Account>>,
    subscribers: Mutex<Vec<(u64, Callback)>>,
    next_id: AtomicU64,
}

impl BridgeInner {
    fn publish(&self, account: Option<Account>) {
        let changed = self.current.send_if_modified(|current| {
            if *current == account {
                false
            } else {
                current.clone_from(&account);
                true
            }
        });
        if !changed {
            return;
        }
        tracing::debug!(
            account = account.as_ref().map_or("-", |a| a.id.as_str()),
            verified = account.as_ref().is_some_and(|a| a.email_verified),
            "session changed"
        );
        // Callbacks run outside the lock so they may subscribe or unsubscribe.
        let callbacks: Vec<Callback> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in &callbacks {
            callback(account.as_ref());
        }
    }

    fn remove(&self, id: u64) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(sub_id, _)| *sub_id != id);
    }
}

/// Bridges identity session changes to the current [`Account`].
pub struct SessionBridge {
    inner: Arc<BridgeInner>,
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SessionBridge {
    /// Resolve the current session and spawn the change listener.
    pub async fn start(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        // Subscribe before reading the current session so no change is missed.
        let changes = identity.session_changes();
        let initial = match identity.current_session() {
            Some(session) => Some(resolve_account(profiles.as_ref(), &session).await),
            None => None,
        };
        let (current, _) = watch::channel(initial);
        let inner = Arc::new(BridgeInner {
            current,
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        });

        let listener = tokio::spawn(listen(
            changes,
            Arc::clone(&identity),
            Arc::clone(&profiles),
            Arc::downgrade(&inner),
        ));

        Self {
            inner,
            identity,
            profiles,
            listener: Mutex::new(Some(listener)),
        }
    }

    /// Register `callback`. It is invoked immediately with the current
    /// account, then once per change, until the returned handle is
    /// unsubscribed or dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&Account>) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: Callback = Arc::new(callback);
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::clone(&callback)));
        let current = self.inner.current.borrow().clone();
        callback(current.as_ref());
        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
            active: true,
        }
    }

    /// A receiver that always holds the latest account. Updated before the
    /// callbacks for a change run.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Option<Account>> {
        self.inner.current.subscribe()
    }

    #[must_use]
    pub fn current(&self) -> Option<Account> {
        self.inner.current.borrow().clone()
    }

    /// Re-resolve the current session now, e.g. after the profile document
    /// changed. Subscribers are only called if the account differs.
    pub async fn refresh(&self) {
        let account = match self.identity.current_session() {
            Some(session) => Some(resolve_account(self.profiles.as_ref(), &session).await),
            None => None,
        };
        self.inner.publish(account);
    }

    /// Stop the change listener. Subscriptions receive no further changes.
    pub fn shutdown(&self) {
        if let Some(handle) = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
            tracing::debug!("session bridge stopped");
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for SessionBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn listen(
    mut changes: broadcast::Receiver<Option<IdentitySession>>,
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    inner: Weak<BridgeInner>,
) {
    loop {
        let session = match changes.recv().await {
            Ok(session) => session,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "session listener lagged; resyncing");
                identity.current_session()
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };
        let account = match &session {
            Some(session) => Some(resolve_account(profiles.as_ref(), session).await),
            None => None,
        };
        let Some(inner) = inner.upgrade() else {
            break;
        };
        inner.publish(account);
    }
}

/// Handle returned by [`SessionBridge::subscribe`].
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    inner: Weak<BridgeInner>,
    active: bool,
}

impl Subscription {
    /// Stop notifications for this callback.
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if std::mem::take(&mut self.active)
            && let Some(inner) = self.inner.upgrade()
        {
            inner.remove(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}
