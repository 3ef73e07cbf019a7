//! CLI response types returned as JSON by `gly` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Analysis, DataEntry, Job};

/// Response from `gly analysis add`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnalysisAddResponse {
    pub analysis: Analysis,
    /// Data entries provisioned for the job, in binding order.
    pub data: Vec<DataEntry>,
    /// Present only when `--create-job` was requested.
    pub job: Option<Job>,
}
