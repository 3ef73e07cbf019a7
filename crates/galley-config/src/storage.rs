//! Database and file-store configuration.

use serde::{Deserialize, Serialize};

fn default_db_path() -> String {
    "galley.db".to_string()
}

fn default_store_root() -> String {
    "store".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Path to the libSQL database file, or `:memory:` for throwaway runs.
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Directory uploaded files and placeholder data directories live under.
    #[serde(default = "default_store_root")]
    pub store_root: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            store_root: default_store_root(),
        }
    }
}
