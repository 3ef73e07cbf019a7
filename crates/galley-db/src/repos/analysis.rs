//! Analysis repository.

use chrono::Utc;

use galley_core::entities::Analysis;
use galley_core::enums::Usage;
use galley_core::ids::PREFIX_ANALYSIS;

use crate::error::{StoreError, map_conflict};
use crate::helpers::{parse_datetime, parse_enum};
use crate::service::GalleyService;

const ANALYSIS_COLS: &str =
    "id, project_id, name, summary, help_text, spec_text, template, usage, created_at";

fn row_to_analysis(row: &libsql::Row) -> Result<Analysis, StoreError> {
    Ok(Analysis {
        id: row.get::<String>(0)?,
        project_id: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        summary: row.get::<String>(3)?,
        help_text: row.get::<String>(4)?,
        spec_text: row.get::<String>(5)?,
        template: row.get::<String>(6)?,
        usage: parse_enum(&row.get::<String>(7)?)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

/// Fields for [`GalleyService::create_analysis`]; the verbatim document and
/// template travel together with the extracted settings.
#[derive(Debug, Clone)]
pub struct NewAnalysis<'a> {
    pub project_id: &'a str,
    pub name: &'a str,
    pub summary: &'a str,
    pub help_text: &'a str,
    pub spec_text: &'a str,
    pub template: &'a str,
    pub usage: Usage,
}

impl GalleyService {
    /// Create an analysis. Names are unique per project; the scoped UNIQUE
    /// constraint turns a duplicate into `AlreadyExists`.
    pub async fn create_analysis(&self, new: NewAnalysis<'_>) -> Result<Analysis, StoreError> {
        let id = self.db().generate_id(PREFIX_ANALYSIS).await?;
        let now = Utc::now();

        self.db()
            .conn()
            .execute(
                "INSERT INTO analyses (id, project_id, name, summary, help_text, spec_text, template, usage, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                libsql::params![
                    id.as_str(),
                    new.project_id,
                    new.name,
                    new.summary,
                    new.help_text,
                    new.spec_text,
                    new.template,
                    new.usage.as_str(),
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| map_conflict("analysis", new.name, e))?;

        Ok(Analysis {
            id,
            project_id: new.project_id.to_string(),
            name: new.name.to_string(),
            summary: new.summary.to_string(),
            help_text: new.help_text.to_string(),
            spec_text: new.spec_text.to_string(),
            template: new.template.to_string(),
            usage: new.usage,
            created_at: now,
        })
    }

    pub async fn find_analysis_by_name(
        &self,
        project_id: &str,
        name: &str,
    ) -> Result<Option<Analysis>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {ANALYSIS_COLS} FROM analyses WHERE project_id = ?1 AND name = ?2"
                ),
                libsql::params![project_id, name],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_analysis(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_analyses(&self, project_id: &str) -> Result<Vec<Analysis>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {ANALYSIS_COLS} FROM analyses WHERE project_id = ?1 ORDER BY name"),
                [project_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_analysis(&row)?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use galley_core::enums::Usage;

    use super::NewAnalysis;
    use crate::error::StoreError;
    use crate::test_support::test_service_with_user;

    #[tokio::test]
    async fn create_stores_document_verbatim() {
        let (svc, user) = test_service_with_user("alice").await;
        let project = svc
            .create_project("demo", &user.id, Usage::User)
            .await
            .unwrap();

        let spec_text = "{\n  settings: { name: X }\n}\n";
        let analysis = svc
            .create_analysis(NewAnalysis {
                project_id: &project.id,
                name: "X",
                summary: "summary",
                help_text: "help",
                spec_text,
                template: "echo {{reads.path}}",
                usage: Usage::User,
            })
            .await
            .unwrap();

        let found = svc
            .find_analysis_by_name(&project.id, "X")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, analysis);
        assert_eq!(found.spec_text, spec_text);
    }

    #[tokio::test]
    async fn duplicate_name_scoped_to_project() {
        let (svc, user) = test_service_with_user("alice").await;
        let p1 = svc
            .create_project("one", &user.id, Usage::User)
            .await
            .unwrap();
        let p2 = svc
            .create_project("two", &user.id, Usage::User)
            .await
            .unwrap();

        let new = |project_id| NewAnalysis {
            project_id,
            name: "align",
            summary: "",
            help_text: "",
            spec_text: "{}",
            template: "",
            usage: Usage::User,
        };

        svc.create_analysis(new(&p1.id)).await.unwrap();
        // Same name in a different project is fine
        svc.create_analysis(new(&p2.id)).await.unwrap();
        // Same name in the same project is not
        let err = svc.create_analysis(new(&p1.id)).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::AlreadyExists {
                entity: "analysis",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn list_analyses_ordered() {
        let (svc, user) = test_service_with_user("alice").await;
        let project = svc
            .create_project("demo", &user.id, Usage::User)
            .await
            .unwrap();
        for name in ["trim", "align", "count"] {
            svc.create_analysis(NewAnalysis {
                project_id: &project.id,
                name,
                summary: "",
                help_text: "",
                spec_text: "{}",
                template: "",
                usage: Usage::User,
            })
            .await
            .unwrap();
        }
        let names: Vec<String> = svc
            .list_analyses(&project.id)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, ["align", "count", "trim"]);
    }
}
