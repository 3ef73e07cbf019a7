use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Usage;

/// Top-level owned workspace containing analyses, jobs, and data.
///
/// Project names are globally unique; creation is atomic insert-if-absent
/// and a name collision is a visible failure, never a silent recreate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub usage: Usage,
    pub created_at: DateTime<Utc>,
}
