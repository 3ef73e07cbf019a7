use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::DataKind;

/// A typed reference to a stored file plus descriptive metadata, owned by a
/// project. The backing `path` must resolve when the record is created.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DataEntry {
    pub id: String,
    pub project_id: String,
    /// Unique within the owning project.
    pub name: String,
    /// Filesystem location of the backing content.
    pub path: String,
    pub kind: DataKind,
    /// Free-form attribute bag carried over from the analysis document.
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
