//! Storage ports.
//!
//! The application layer depends on these traits rather than on [`HubDb`]
//! directly, so tests and alternative back ends can supply their own
//! implementation.
//!
//! [`HubDb`]: crate::HubDb

use async_trait::async_trait;
use hub_core::entities::{Profile, Project};

use crate::error::StoreError;

/// Project listing collection.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Listings with status `published`, featured first then newest first.
    async fn list_published(&self) -> Result<Vec<Project>, StoreError>;

    /// Every listing owned by `owner_id`, regardless of status, newest first.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Project>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Project>, StoreError>;

    /// Insert a new listing. Fails with [`StoreError::Conflict`] if the id is taken.
    async fn create(&self, project: &Project) -> Result<(), StoreError>;

    /// Replace a listing. Fails with [`StoreError::NotFound`] if it is absent.
    async fn update(&self, project: &Project) -> Result<(), StoreError>;

    /// Remove a listing. Fails with [`StoreError::NotFound`] if it is absent.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Private per-account profile documents.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, account_id: &str) -> Result<Option<Profile>, StoreError>;

    /// Insert or replace the profile keyed by `profile.account_id`.
    async fn put_profile(&self, profile: &Profile) -> Result<(), StoreError>;
}
