use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{JobState, Usage};

/// One instantiation of an analysis bound to resolved data entries.
///
/// `spec_text` and `template` are snapshots taken from the analysis at
/// creation time. `state` is owned by the execution engine; Galley only
/// creates jobs in the queued state.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Job {
    pub id: String,
    pub analysis_id: String,
    pub project_id: String,
    pub state: JobState,
    pub spec_text: String,
    pub template: String,
    pub usage: Usage,
    /// IDs of the data entries bound to this job.
    pub data_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}
