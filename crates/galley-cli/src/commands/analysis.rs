use anyhow::Context;
use galley_core::responses::AnalysisAddResponse;
use galley_ingest::{IngestError, IngestRequest, ingest};
use tracing::error;

use crate::cli::{AnalysisCommands, OutputFormat};
use crate::commands::parse_usage;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    action: AnalysisCommands,
    ctx: &AppContext,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let AnalysisCommands::Add {
        project,
        spec,
        template,
        usage,
        project_usage,
        create_job,
    } = action;

    let usage = parse_usage(&usage)?;
    let project = ctx
        .service
        .find_project_by_name(&project)
        .await?
        .with_context(|| format!("no project named '{project}'"))?;

    if let Some(project_usage) = project_usage {
        let project_usage = parse_usage(&project_usage)?;
        ctx.service
            .set_project_usage(&project.id, project_usage)
            .await?;
    }

    let spec_text = tokio::fs::read_to_string(&spec)
        .await
        .with_context(|| format!("no file found for --spec={}", spec.display()))?;
    let template_text = tokio::fs::read_to_string(&template)
        .await
        .with_context(|| format!("no file found for --template={}", template.display()))?;

    let outcome = ingest(
        &ctx.service,
        IngestRequest {
            project: &project,
            spec_text: &spec_text,
            template: &template_text,
            usage,
            create_job,
        },
    )
    .await;

    match outcome {
        Ok(outcome) => output(
            &AnalysisAddResponse {
                analysis: outcome.analysis,
                data: outcome.data,
                job: outcome.job,
            },
            format,
        ),
        Err(err) => {
            // A partial failure keeps its data entries; tell the caller
            // exactly what exists before failing the command.
            if let IngestError::Unresolved { created, .. } = &err {
                for entry in created {
                    error!(data = %entry.name, path = %entry.path, "data entry was created before the failure");
                }
            }
            Err(err.into())
        }
    }
}
