//! Command handlers, one module per command group.

pub mod analysis;
pub mod project;
pub mod serve;
pub mod user;

use crate::cli::{Cli, Commands};
use crate::context::AppContext;

/// Route a parsed command to its handler.
pub async fn dispatch(cli: Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Commands::Serve => serve::run(ctx).await,
        Commands::User { action } => user::run(action, ctx, format).await,
        Commands::Project { action } => project::run(action, ctx, format).await,
        Commands::Analysis { action } => analysis::run(action, ctx, format).await,
    }
}

/// Parse an audience label the way the enums serialize (`snake_case`).
pub fn parse_usage(value: &str) -> anyhow::Result<galley_core::enums::Usage> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| anyhow::anyhow!("invalid usage '{value}' (expected internal, user, or public)"))
}
