//! # galley-db
//!
//! libSQL store for the Galley domain tree.
//!
//! Handles all relational state: users, projects, analyses, data entries,
//! jobs, and job/data bindings. Uniqueness scopes (global project names,
//! per-project analysis and data names) are enforced by SQL UNIQUE
//! constraints so that concurrent creates serialize inside the store —
//! creation is never a separate existence check followed by an insert.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod test_support;

use error::StoreError;
use libsql::Builder;

/// Central database handle for all Galley state operations.
///
/// Wraps a libSQL database and connection; provides ID generation. Repo
/// methods live on [`service::GalleyService`].
pub struct GalleyDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl GalleyDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or migrations
    /// fail.
    pub async fn open_local(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| StoreError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let galley_db = Self { db, conn };
        galley_db.run_migrations().await?;
        Ok(galley_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"prj-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the
    /// prefix.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, StoreError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(StoreError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
