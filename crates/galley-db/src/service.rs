//! Service layer the gateway, ingestor, and CLI all talk to.
//!
//! `GalleyService` wraps `GalleyDb` (raw database access); all repo methods
//! are implemented as `impl GalleyService` in `repos/*`. The service is
//! shared between concurrent protocol sessions behind an `Arc` — session
//! state never lives here.

use crate::GalleyDb;
use crate::error::StoreError;

/// Orchestrates store mutations for the Galley domain tree.
pub struct GalleyService {
    db: GalleyDb,
}

impl GalleyService {
    /// Open a service backed by a local database file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened.
    pub async fn open(db_path: &str) -> Result<Self, StoreError> {
        let db = GalleyDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create from an existing `GalleyDb` (for testing).
    #[must_use]
    pub const fn from_db(db: GalleyDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &GalleyDb {
        &self.db
    }
}
