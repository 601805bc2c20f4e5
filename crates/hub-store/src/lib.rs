//! # hub-store
//!
//! libSQL storage for AfroTech Hub: the project listing collection and the
//! private per-account profile documents.
//!
//! Callers depend on the [`ports::ProjectStore`] and [`ports::ProfileStore`]
//! traits; [`HubDb`] is the local libSQL implementation of both.

pub mod error;
pub mod helpers;
mod migrations;
pub mod ports;
pub mod repos;
mod test_support;

use chrono::Utc;
use error::StoreError;
use hub_config::StorageConfig;
use libsql::Builder;

pub use ports::{ProfileStore, ProjectStore};

/// Database handle for listings and profiles.
pub struct HubDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl HubDb {
    /// Open a local database at `path` (`:memory:` for an in-process store).
    ///
    /// Runs migrations on every open.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| StoreError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let hub_db = Self { db, conn };
        hub_db.run_migrations().await?;
        Ok(hub_db)
    }

    /// Open the store described by `config`, seeding the showcase catalogue
    /// into an empty store when `seed_catalogue` is set.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if opening or seeding fails.
    pub async fn open(config: &StorageConfig) -> Result<Self, StoreError> {
        tracing::debug!(path = %config.path, "opening store");
        let db = Self::open_local(&config.path).await?;
        if config.seed_catalogue {
            db.seed_catalogue_if_empty().await?;
        }
        Ok(db)
    }

    /// Insert the showcase catalogue if no listing exists yet.
    ///
    /// Returns the number of listings inserted.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a query fails.
    pub async fn seed_catalogue_if_empty(&self) -> Result<usize, StoreError> {
        if self.count_projects().await? > 0 {
            return Ok(0);
        }
        let seeds = hub_core::catalogue::seed_projects(Utc::now());
        for project in &seeds {
            self.insert_project(project).await?;
        }
        tracing::info!(count = seeds.len(), "seeded showcase catalogue");
        Ok(seeds.len())
    }

    /// Direct access to the libSQL connection.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
