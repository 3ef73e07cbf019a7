//! # galley-ingest
//!
//! Bulk provisioning from declarative analysis documents.
//!
//! An analysis document is a JSON object with a reserved `settings` section
//! (`name`, `help`, `summary`) and zero or more named data fields, each
//! optionally carrying `path` and `data_type` plus arbitrary extra metadata.
//! Ingesting a document creates an analysis under a project; with job
//! creation enabled it also materializes every path-bearing field as a data
//! entry and stands up one queued job bound to all of them — or reports
//! exactly how far it got when a path fails to resolve.

pub mod document;
pub mod error;
mod ingest;

pub use document::{AnalysisDoc, DataField, DocSettings};
pub use error::IngestError;
pub use ingest::{IngestOutcome, IngestRequest, ingest};
