use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Usage;

/// A named, reusable computation definition within a project.
///
/// `spec_text` and `template` are stored verbatim. Jobs snapshot both at
/// creation time, so editing an analysis never mutates an existing job.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Analysis {
    pub id: String,
    pub project_id: String,
    /// Unique within the owning project.
    pub name: String,
    pub summary: String,
    pub help_text: String,
    /// The analysis document exactly as supplied.
    pub spec_text: String,
    /// Executable template body, rendered by the external execution engine.
    pub template: String,
    pub usage: Usage,
    pub created_at: DateTime<Utc>,
}
