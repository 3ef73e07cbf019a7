//! The provisioning pipeline: document → analysis → data entries → job.

use galley_core::entities::{Analysis, DataEntry, Job, Project};
use galley_core::enums::{DataKind, Usage};
use galley_db::repos::analysis::NewAnalysis;
use galley_db::service::GalleyService;
use tracing::{debug, info};

use crate::document::AnalysisDoc;
use crate::error::IngestError;

/// Inputs to [`ingest`]. The project must already be resolved; the document
/// and template travel as raw text and are stored verbatim.
#[derive(Debug, Clone)]
pub struct IngestRequest<'a> {
    pub project: &'a Project,
    pub spec_text: &'a str,
    pub template: &'a str,
    pub usage: Usage,
    pub create_job: bool,
}

/// What an ingestion produced. `job` is `None` when job creation was not
/// requested.
#[derive(Debug)]
pub struct IngestOutcome {
    pub analysis: Analysis,
    pub data: Vec<DataEntry>,
    pub job: Option<Job>,
}

/// Provision an analysis (and optionally a job) from a document.
///
/// The analysis is created first; a parse failure or name conflict aborts
/// before any mutation beyond it. With `create_job` set, every path-bearing
/// field becomes a data entry and one queued job binds them all. Job binding
/// is all-or-nothing: an unresolvable path aborts with
/// [`IngestError::Unresolved`] carrying the entries created so far, and no
/// job row ever exists for the failed run.
pub async fn ingest(
    svc: &GalleyService,
    req: IngestRequest<'_>,
) -> Result<IngestOutcome, IngestError> {
    let doc = AnalysisDoc::parse(req.spec_text)?;
    let settings = doc.settings();

    let analysis = svc
        .create_analysis(NewAnalysis {
            project_id: &req.project.id,
            name: &settings.name,
            summary: &settings.summary,
            help_text: &settings.help,
            spec_text: req.spec_text,
            template: req.template,
            usage: req.usage,
        })
        .await?;
    info!(
        analysis = %analysis.name,
        project = %req.project.name,
        "added analysis"
    );

    if !req.create_job {
        return Ok(IngestOutcome {
            analysis,
            data: Vec::new(),
            job: None,
        });
    }

    let mut created: Vec<DataEntry> = Vec::new();
    for field in doc.data_fields() {
        let Some(path) = field.path else {
            debug!(field = %field.name, "field carries no path, skipping");
            continue;
        };
        if tokio::fs::metadata(&path).await.is_err() {
            return Err(IngestError::Unresolved {
                field: field.name,
                path,
                created,
            });
        }
        let kind = DataKind::from_label(field.data_type.as_deref());
        let name = file_name_of(&path);
        let (entry, _) = svc
            .upsert_data(&req.project.id, &name, &path, kind, Some(&field.metadata))
            .await?;
        debug!(data = %entry.name, kind = %entry.kind, "deposited data entry");
        created.push(entry);
    }

    let data_ids: Vec<String> = created.iter().map(|d| d.id.clone()).collect();
    let job = svc.create_job(&analysis, &data_ids, req.usage).await?;
    info!(job = %job.id, analysis = %analysis.name, "queued job");

    Ok(IngestOutcome {
        analysis,
        data: created,
        job: Some(job),
    })
}

/// Data entries are named after the final component of their backing path.
fn file_name_of(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .map_or_else(|| path.to_string(), String::from)
}
