//! Store error types for galley-db.

use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced entity does not exist in its scope.
    #[error("{entity} not found: {name}")]
    NotFound { entity: &'static str, name: String },

    /// A name conflict within the entity's uniqueness scope.
    #[error("{entity} already exists: {name}")]
    AlreadyExists { entity: &'static str, name: String },

    /// A data entry's backing path could not be resolved on disk.
    #[error("data path does not resolve: {path}")]
    Unresolved { path: String },

    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Map an INSERT failure to [`StoreError::AlreadyExists`] when it was a
/// uniqueness violation for the named scope, and pass everything else through.
pub(crate) fn map_conflict(entity: &'static str, name: &str, err: libsql::Error) -> StoreError {
    if err.to_string().contains("UNIQUE constraint failed") {
        StoreError::AlreadyExists {
            entity,
            name: name.to_string(),
        }
    } else {
        StoreError::LibSql(err)
    }
}
