use crate::cli::{OutputFormat, UserCommands};
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    action: UserCommands,
    ctx: &AppContext,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        UserCommands::Add { name, admin } => {
            let user = ctx.service.create_user(&name, admin).await?;
            output(&user, format)
        }
        UserCommands::List => {
            let users = ctx.service.list_users().await?;
            output(&users, format)
        }
    }
}
