use anyhow::Context;

use crate::cli::{OutputFormat, ProjectCommands};
use crate::commands::parse_usage;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    action: ProjectCommands,
    ctx: &AppContext,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        ProjectCommands::Create { name, owner, usage } => {
            let usage = parse_usage(&usage)?;
            let owner = ctx
                .service
                .find_user_by_name(&owner)
                .await?
                .with_context(|| format!("no account named '{owner}'"))?;
            let project = ctx.service.create_project(&name, &owner.id, usage).await?;
            output(&project, format)
        }
        ProjectCommands::List => {
            let projects = ctx.service.list_projects().await?;
            output(&projects, format)
        }
    }
}
