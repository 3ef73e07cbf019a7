use std::sync::Arc;

use galley_ftp::{FtpServer, Gateway, TokenAuthenticator};
use tracing::warn;

use crate::context::AppContext;

pub async fn run(ctx: &AppContext) -> anyhow::Result<()> {
    if !ctx.config.auth.is_configured() {
        warn!("auth.service_token is empty; every login will be rejected");
    }

    let gateway = Gateway::new(
        Arc::clone(&ctx.service),
        ctx.config.storage.store_root.as_str(),
    );
    let auth = TokenAuthenticator::new(
        Arc::clone(&ctx.service),
        ctx.config.auth.service_token.as_str(),
    );

    let server = FtpServer::bind(&ctx.config.server, gateway, auth).await?;
    server.run().await?;
    Ok(())
}
