//! Migration runner: SQL files embedded at compile time, executed on open.
//! Every statement uses `IF NOT EXISTS`, so re-running is harmless.

use crate::GalleyDb;
use crate::error::StoreError;

/// Initial schema: 6 tables, 5 indexes.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl GalleyDb {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| StoreError::Migration(format!("001_initial: {e}")))?;
        Ok(())
    }
}
