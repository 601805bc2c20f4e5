//! Developer console: the owner's listings and the mutations on them.
//!
//! Every mutation validates the draft locally, checks ownership against the
//! store, writes through the [`ProjectStore`] port, then reloads the owner's
//! list. Only one mutation may be in flight at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use hub_core::account::Account;
use hub_core::entities::Project;
use hub_core::ids::{self, PREFIX_PROJECT};
use hub_core::validation::ProjectDraft;
use hub_store::ProjectStore;
use tracing::{debug, info};

use crate::error::ConsoleError;

/// Console bound to one verified developer account.
pub struct Console<S: ProjectStore + ?Sized> {
    store: Arc<S>,
    account: Account,
    projects: Mutex<Vec<Project>>,
    busy: AtomicBool,
}

/// Clears the busy flag when the mutation finishes or is dropped.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: ProjectStore + ?Sized> Console<S> {
    /// Open the console for `account` and load its listings.
    ///
    /// # Errors
    ///
    /// `NotVerified` or `NotDeveloper` when the account may not use the
    /// console; `Store` if the initial load fails.
    pub async fn open(store: Arc<S>, account: &Account) -> Result<Self, ConsoleError> {
        if !account.email_verified {
            return Err(ConsoleError::NotVerified);
        }
        if !account.can_use_console() {
            return Err(ConsoleError::NotDeveloper);
        }
        let console = Self {
            store,
            account: account.clone(),
            projects: Mutex::new(Vec::new()),
            busy: AtomicBool::new(false),
        };
        console.refresh().await?;
        Ok(console)
    }

    #[must_use]
    pub const fn account(&self) -> &Account {
        &self.account
    }

    /// Snapshot of the owner's listings, newest first.
    #[must_use]
    pub fn projects(&self) -> Vec<Project> {
        self.projects.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Reload the owner's listings from the store.
    ///
    /// # Errors
    ///
    /// Returns `Store` if the listing query fails.
    pub async fn refresh(&self) -> Result<(), ConsoleError> {
        let list = self.store.list_by_owner(&self.account.id).await?;
        debug!(owner = %self.account.id, count = list.len(), "console list loaded");
        *self.projects.lock().unwrap_or_else(PoisonError::into_inner) = list;
        Ok(())
    }

    /// Create a new listing owned by this account.
    ///
    /// # Errors
    ///
    /// `Busy`, `Validation`, or a store failure.
    pub async fn create(&self, draft: ProjectDraft) -> Result<Project, ConsoleError> {
        let _guard = self.acquire()?;
        draft.validate().map_err(ConsoleError::Validation)?;

        let id = ids::generate(PREFIX_PROJECT)?;
        let project = draft.into_project(id, &self.account.id, None, Utc::now());
        self.store.create(&project).await?;
        info!(id = %project.id, status = %project.status, "listing created");

        self.refresh().await?;
        Ok(project)
    }

    /// Save an edited listing. `draft.id` names the listing to replace.
    ///
    /// # Errors
    ///
    /// `Busy`, `MissingId`, `Validation`, `NotFound`, `NotOwner`,
    /// `InvalidStatusChange`, or a store failure.
    pub async fn update(&self, draft: ProjectDraft) -> Result<Project, ConsoleError> {
        let _guard = self.acquire()?;
        let id = draft.id.clone().ok_or(ConsoleError::MissingId)?;
        draft.validate().map_err(ConsoleError::Validation)?;

        let existing = self.owned(&id).await?;
        if !existing.status.can_transition_to(draft.status) {
            return Err(ConsoleError::InvalidStatusChange {
                from: existing.status,
                to: draft.status,
            });
        }

        let project = draft.into_project(id, &self.account.id, Some(&existing), Utc::now());
        self.store.update(&project).await?;
        info!(id = %project.id, status = %project.status, "listing updated");

        self.refresh().await?;
        Ok(project)
    }

    /// Delete a listing owned by this account.
    ///
    /// # Errors
    ///
    /// `Busy`, `NotFound`, `NotOwner`, or a store failure.
    pub async fn delete(&self, id: &str) -> Result<(), ConsoleError> {
        let _guard = self.acquire()?;
        self.owned(id).await?;
        self.store.delete(id).await?;
        info!(%id, "listing deleted");
        self.refresh().await
    }

    fn acquire(&self) -> Result<BusyGuard<'_>, ConsoleError> {
        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(ConsoleError::Busy);
        }
        Ok(BusyGuard(&self.busy))
    }

    async fn owned(&self, id: &str) -> Result<Project, ConsoleError> {
        let project = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| ConsoleError::NotFound { id: id.to_string() })?;
        if !project.is_owned_by(&self.account.id) {
            return Err(ConsoleError::NotOwner { id: id.to_string() });
        }
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_core::catalogue::STUDIO_OWNER_ID;
    use hub_core::enums::{ProjectStatus, Role};
    use hub_core::validation::ProjectField;
    use hub_store::HubDb;
    use pretty_assertions::assert_eq;

    fn developer() -> Account {
        let mut acc = Account::newly_created("uid-0001", "Ada", "ada@example.com");
        acc.role = Role::Developer;
        acc.email_verified = true;
        acc
    }

    fn draft(title: &str) -> ProjectDraft {
        ProjectDraft {
            title: title.into(),
            description: "Deep work timer".into(),
            category: "Productivity".into(),
            ..Default::default()
        }
    }

    async fn seeded_store() -> Arc<HubDb> {
        let db = HubDb::open_local(":memory:").await.unwrap();
        db.seed_catalogue_if_empty().await.unwrap();
        Arc::new(db)
    }

    #[tokio::test]
    async fn refuses_unverified_and_plain_users() {
        let store = seeded_store().await;

        let mut unverified = developer();
        unverified.email_verified = false;
        assert!(matches!(
            Console::open(store.clone(), &unverified).await,
            Err(ConsoleError::NotVerified)
        ));

        let mut user = developer();
        user.role = Role::User;
        assert!(matches!(Console::open(store, &user).await, Err(ConsoleError::NotDeveloper)));
    }

    #[tokio::test]
    async fn lists_only_own_projects() {
        let store = seeded_store().await;
        let console = Console::open(store, &developer()).await.unwrap();
        assert!(console.projects().is_empty());
    }

    #[tokio::test]
    async fn create_refreshes_list() {
        let store = seeded_store().await;
        let console = Console::open(store.clone(), &developer()).await.unwrap();

        let created = console.create(draft("FlowState")).await.unwrap();
        assert!(ids::has_prefix(&created.id, PREFIX_PROJECT));
        assert_eq!(created.owner_id, "uid-0001");
        assert_eq!(created.status, ProjectStatus::Draft);

        let listed = console.projects();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert!(store.get(&created.id).await.unwrap().is_some());
        assert!(!console.is_busy());
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_store() {
        let store = seeded_store().await;
        let console = Console::open(store.clone(), &developer()).await.unwrap();

        let mut bad = draft("   ");
        bad.status = ProjectStatus::Published;
        bad.repo_url = "github.com/afrotech".into();
        let Err(ConsoleError::Validation(errors)) = console.create(bad).await else {
            panic!("expected validation failure");
        };
        assert!(errors.contains(ProjectField::Title));
        assert!(errors.contains(ProjectField::ImageUrl));
        assert!(errors.contains(ProjectField::RepoUrl));
        assert_eq!(store.count_projects().await.unwrap(), 4);
        assert!(!console.is_busy());
    }

    #[tokio::test]
    async fn update_keeps_counters_and_refreshes() {
        let store = seeded_store().await;
        let console = Console::open(store, &developer()).await.unwrap();
        let created = console.create(draft("FlowState")).await.unwrap();

        let mut edit = ProjectDraft::from_project(&created);
        edit.title = "FlowState Pro".into();
        edit.status = ProjectStatus::Published;
        edit.image_url = "https://picsum.photos/800/600".into();
        let updated = console.update(edit).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(console.projects()[0].title, "FlowState Pro");
        assert!(console.projects()[0].is_published());
    }

    #[tokio::test]
    async fn update_requires_id() {
        let store = seeded_store().await;
        let console = Console::open(store, &developer()).await.unwrap();
        assert!(matches!(console.update(draft("x")).await, Err(ConsoleError::MissingId)));
    }

    #[tokio::test]
    async fn published_cannot_go_back_to_review() {
        let store = seeded_store().await;
        let console = Console::open(store, &developer()).await.unwrap();
        let mut d = draft("Lens");
        d.status = ProjectStatus::Published;
        d.image_url = "https://picsum.photos/800/600".into();
        let created = console.create(d).await.unwrap();

        let mut edit = ProjectDraft::from_project(&created);
        edit.status = ProjectStatus::InReview;
        assert!(matches!(
            console.update(edit).await,
            Err(ConsoleError::InvalidStatusChange { from: ProjectStatus::Published, to: ProjectStatus::InReview })
        ));
    }

    #[tokio::test]
    async fn foreign_listings_are_rejected() {
        let store = seeded_store().await;
        let console = Console::open(store.clone(), &developer()).await.unwrap();
        let studio = store.get("app-00000001").await.unwrap().unwrap();
        assert_eq!(studio.owner_id, STUDIO_OWNER_ID);

        let mut edit = ProjectDraft::from_project(&studio);
        edit.title = "Hijacked".into();
        assert!(matches!(console.update(edit).await, Err(ConsoleError::NotOwner { .. })));
        assert!(matches!(console.delete("app-00000001").await, Err(ConsoleError::NotOwner { .. })));
        assert_eq!(store.get("app-00000001").await.unwrap().unwrap().title, studio.title);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let store = seeded_store().await;
        let console = Console::open(store, &developer()).await.unwrap();
        assert!(matches!(console.delete("app-deadbeef").await, Err(ConsoleError::NotFound { .. })));
    }

    #[tokio::test]
    async fn delete_refreshes_list() {
        let store = seeded_store().await;
        let console = Console::open(store.clone(), &developer()).await.unwrap();
        let created = console.create(draft("Temp")).await.unwrap();
        console.delete(&created.id).await.unwrap();
        assert!(console.projects().is_empty());
        assert!(store.get(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_mutation_while_busy_is_rejected() {
        let store = seeded_store().await;
        let console = Console::open(store.clone(), &developer()).await.unwrap();

        let guard = console.acquire().unwrap();
        assert!(console.is_busy());
        assert!(matches!(console.create(draft("Dup")).await, Err(ConsoleError::Busy)));
        assert!(matches!(console.delete("app-00000001").await, Err(ConsoleError::Busy)));
        drop(guard);

        assert!(!console.is_busy());
        console.create(draft("After")).await.unwrap();
        assert_eq!(store.count_projects().await.unwrap(), 5);
    }
}
