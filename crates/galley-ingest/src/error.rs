//! Ingestion error types.

use galley_core::entities::DataEntry;
use galley_db::error::StoreError;
use thiserror::Error;

/// Errors from document parsing and provisioning.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The document text is not a parseable JSON object.
    #[error("invalid analysis document: {0}")]
    Malformed(String),

    /// A data field's `path` could not be resolved on disk. No job is
    /// created; `created` reports the data entries provisioned before the
    /// failure so the caller can decide to keep or discard them.
    #[error("data path does not resolve: '{path}' (field '{field}')")]
    Unresolved {
        field: String,
        path: String,
        created: Vec<DataEntry>,
    },

    /// The underlying store rejected an operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IngestError {
    /// Data entries that were provisioned before the operation failed.
    /// Empty for every variant except `Unresolved`.
    #[must_use]
    pub fn created_so_far(&self) -> &[DataEntry] {
        match self {
            Self::Unresolved { created, .. } => created,
            _ => &[],
        }
    }
}
