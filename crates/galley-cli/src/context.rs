//! Application context shared by command handlers.

use std::sync::Arc;

use anyhow::Context;
use galley_config::GalleyConfig;
use galley_db::service::GalleyService;

/// Everything a command handler needs: the loaded configuration and an open
/// store service.
pub struct AppContext {
    pub config: GalleyConfig,
    pub service: Arc<GalleyService>,
}

impl AppContext {
    /// Open the store named by the configuration.
    pub async fn init(config: GalleyConfig) -> anyhow::Result<Self> {
        let service = GalleyService::open(&config.storage.db_path)
            .await
            .with_context(|| format!("failed to open database '{}'", config.storage.db_path))?;
        Ok(Self {
            config,
            service: Arc::new(service),
        })
    }
}
