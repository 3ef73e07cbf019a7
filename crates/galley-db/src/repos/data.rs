//! Data entry repository.
//!
//! A data entry's backing path must resolve on disk when the record is
//! written; both creation paths check this before touching the table.

use chrono::Utc;

use galley_core::entities::DataEntry;
use galley_core::enums::DataKind;
use galley_core::ids::PREFIX_DATA;

use crate::error::{StoreError, map_conflict};
use crate::helpers::{parse_datetime, parse_enum, parse_optional_json};
use crate::service::GalleyService;

const DATA_COLS: &str = "id, project_id, name, path, kind, metadata, created_at, updated_at";

fn row_to_data(row: &libsql::Row) -> Result<DataEntry, StoreError> {
    let metadata = row.get::<Option<String>>(5)?;
    Ok(DataEntry {
        id: row.get::<String>(0)?,
        project_id: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        path: row.get::<String>(3)?,
        kind: parse_enum(&row.get::<String>(4)?)?,
        metadata: parse_optional_json(metadata.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

async fn require_resolvable(path: &str) -> Result<(), StoreError> {
    if tokio::fs::metadata(path).await.is_err() {
        return Err(StoreError::Unresolved {
            path: path.to_string(),
        });
    }
    Ok(())
}

fn metadata_text(metadata: Option<&serde_json::Value>) -> Result<Option<String>, StoreError> {
    metadata
        .map(|value| {
            serde_json::to_string(value)
                .map_err(|e| StoreError::Query(format!("Invalid metadata JSON: {e}")))
        })
        .transpose()
}

impl GalleyService {
    /// Create a data entry, rejecting duplicates within the project.
    pub async fn create_data(
        &self,
        project_id: &str,
        name: &str,
        path: &str,
        kind: DataKind,
        metadata: Option<&serde_json::Value>,
    ) -> Result<DataEntry, StoreError> {
        require_resolvable(path).await?;

        let id = self.db().generate_id(PREFIX_DATA).await?;
        let now = Utc::now();
        let metadata_json = metadata_text(metadata)?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO data_entries (id, project_id, name, path, kind, metadata, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                libsql::params![
                    id.as_str(),
                    project_id,
                    name,
                    path,
                    kind.as_str(),
                    metadata_json.as_deref(),
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| map_conflict("data", name, e))?;

        Ok(DataEntry {
            id,
            project_id: project_id.to_string(),
            name: name.to_string(),
            path: path.to_string(),
            kind,
            metadata: metadata.cloned(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Create a data entry, replacing content in place when the name already
    /// exists within the project.
    ///
    /// This is the single spot where the deposit conflict policy lives; flip
    /// it here if replace-in-place ever becomes reject.
    ///
    /// Returns the stored entry and whether an existing record was replaced.
    pub async fn upsert_data(
        &self,
        project_id: &str,
        name: &str,
        path: &str,
        kind: DataKind,
        metadata: Option<&serde_json::Value>,
    ) -> Result<(DataEntry, bool), StoreError> {
        require_resolvable(path).await?;

        let existed = self.find_data_by_name(project_id, name).await?.is_some();
        let id = self.db().generate_id(PREFIX_DATA).await?;
        let now = Utc::now();
        let metadata_json = metadata_text(metadata)?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO data_entries (id, project_id, name, path, kind, metadata, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                 ON CONFLICT(project_id, name) DO UPDATE SET
                   path = ?4, kind = ?5, metadata = ?6, updated_at = ?7",
                libsql::params![
                    id.as_str(),
                    project_id,
                    name,
                    path,
                    kind.as_str(),
                    metadata_json.as_deref(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        let entry = self
            .find_data_by_name(project_id, name)
            .await?
            .ok_or(StoreError::NoResult)?;
        Ok((entry, existed))
    }

    pub async fn find_data_by_name(
        &self,
        project_id: &str,
        name: &str,
    ) -> Result<Option<DataEntry>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {DATA_COLS} FROM data_entries WHERE project_id = ?1 AND name = ?2"),
                libsql::params![project_id, name],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_data(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_data(&self, project_id: &str) -> Result<Vec<DataEntry>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {DATA_COLS} FROM data_entries WHERE project_id = ?1 ORDER BY name"),
                [project_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_data(&row)?);
        }
        Ok(results)
    }
}
