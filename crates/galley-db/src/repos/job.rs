//! Job repository.
//!
//! Jobs snapshot their analysis's document and template at creation time and
//! bind to resolved data entries. The job row and all its bindings commit in
//! one transaction — a half-bound job is never visible to readers.

use chrono::Utc;

use galley_core::entities::{Analysis, Job};
use galley_core::enums::{JobState, Usage};
use galley_core::ids::PREFIX_JOB;

use crate::error::StoreError;
use crate::helpers::{parse_datetime, parse_enum};
use crate::service::GalleyService;

const JOB_COLS: &str = "id, analysis_id, project_id, state, spec_text, template, usage, created_at";

fn row_to_job(row: &libsql::Row, data_ids: Vec<String>) -> Result<Job, StoreError> {
    Ok(Job {
        id: row.get::<String>(0)?,
        analysis_id: row.get::<String>(1)?,
        project_id: row.get::<String>(2)?,
        state: parse_enum(&row.get::<String>(3)?)?,
        spec_text: row.get::<String>(4)?,
        template: row.get::<String>(5)?,
        usage: parse_enum(&row.get::<String>(6)?)?,
        data_ids,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl GalleyService {
    /// Create a queued job for `analysis` bound to `data_ids`.
    ///
    /// The insert of the job row and every binding row happens inside one
    /// transaction; an error on any binding rolls the whole job back.
    pub async fn create_job(
        &self,
        analysis: &Analysis,
        data_ids: &[String],
        usage: Usage,
    ) -> Result<Job, StoreError> {
        let id = self.db().generate_id(PREFIX_JOB).await?;
        let now = Utc::now();

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "INSERT INTO jobs (id, analysis_id, project_id, state, spec_text, template, usage, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            libsql::params![
                id.as_str(),
                analysis.id.as_str(),
                analysis.project_id.as_str(),
                JobState::Queued.as_str(),
                analysis.spec_text.as_str(),
                analysis.template.as_str(),
                usage.as_str(),
                now.to_rfc3339()
            ],
        )
        .await?;
        for data_id in data_ids {
            tx.execute(
                "INSERT INTO job_data (job_id, data_id) VALUES (?1, ?2)",
                libsql::params![id.as_str(), data_id.as_str()],
            )
            .await?;
        }
        tx.commit().await?;

        Ok(Job {
            id,
            analysis_id: analysis.id.clone(),
            project_id: analysis.project_id.clone(),
            state: JobState::Queued,
            spec_text: analysis.spec_text.clone(),
            template: analysis.template.clone(),
            usage,
            data_ids: data_ids.to_vec(),
            created_at: now,
        })
    }

    pub async fn find_job(&self, id: &str) -> Result<Option<Job>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {JOB_COLS} FROM jobs WHERE id = ?1"), [id])
            .await?;
        match rows.next().await? {
            Some(row) => {
                let data_ids = self.job_data_ids(id).await?;
                Ok(Some(row_to_job(&row, data_ids)?))
            }
            None => Ok(None),
        }
    }

    pub async fn list_jobs(&self, project_id: &str) -> Result<Vec<Job>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {JOB_COLS} FROM jobs WHERE project_id = ?1 ORDER BY created_at, id"),
                [project_id],
            )
            .await?;
        let mut bare = Vec::new();
        while let Some(row) = rows.next().await? {
            bare.push((row.get::<String>(0)?, row));
        }
        let mut results = Vec::new();
        for (id, row) in bare {
            let data_ids = self.job_data_ids(&id).await?;
            results.push(row_to_job(&row, data_ids)?);
        }
        Ok(results)
    }

    /// Update a job's state. State ownership belongs to the execution
    /// engine; this is the hook it calls through.
    pub async fn set_job_state(&self, id: &str, state: JobState) -> Result<(), StoreError> {
        let affected = self
            .db()
            .conn()
            .execute(
                "UPDATE jobs SET state = ?2 WHERE id = ?1",
                libsql::params![id, state.as_str()],
            )
            .await?;
        if affected == 0 {
            return Err(StoreError::NotFound {
                entity: "job",
                name: id.to_string(),
            });
        }
        Ok(())
    }

    async fn job_data_ids(&self, job_id: &str) -> Result<Vec<String>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT data_id FROM job_data WHERE job_id = ?1 ORDER BY data_id",
                [job_id],
            )
            .await?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<String>(0)?);
        }
        Ok(ids)
    }
}
