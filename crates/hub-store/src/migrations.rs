//! Migration runner.
//!
//! Embeds the SQL files at compile time and executes them on open. All
//! statements use `IF NOT EXISTS`, so re-running is a no-op.

use crate::HubDb;
use crate::error::StoreError;

/// Initial schema: `projects` and `profiles` plus two indexes.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl HubDb {
    pub(crate) async fn run_migrations(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| StoreError::Migration(format!("001_initial: {e}")))?;
        Ok(())
    }
}
