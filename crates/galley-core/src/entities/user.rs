use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An account that can log in and own projects. Credential storage lives
/// outside Galley; this record only carries identity and privileges.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: String,
    /// Login name, globally unique.
    pub name: String,
    /// Admins see every project regardless of ownership or usage.
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}
