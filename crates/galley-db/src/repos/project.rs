//! Project repository — creation, lookup, and session visibility.

use chrono::Utc;

use galley_core::entities::{Project, User};
use galley_core::enums::Usage;
use galley_core::ids::PREFIX_PROJECT;

use crate::error::{StoreError, map_conflict};
use crate::helpers::{parse_datetime, parse_enum};
use crate::service::GalleyService;

const PROJECT_COLS: &str = "id, name, owner_id, usage, created_at";

fn row_to_project(row: &libsql::Row) -> Result<Project, StoreError> {
    Ok(Project {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        owner_id: row.get::<String>(2)?,
        usage: parse_enum(&row.get::<String>(3)?)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl GalleyService {
    /// Create a project. The global name scope is guarded by the UNIQUE
    /// constraint, so racing creates resolve to exactly one winner.
    ///
    /// # Errors
    ///
    /// `StoreError::AlreadyExists` when the name is taken.
    pub async fn create_project(
        &self,
        name: &str,
        owner_id: &str,
        usage: Usage,
    ) -> Result<Project, StoreError> {
        let id = self.db().generate_id(PREFIX_PROJECT).await?;
        let now = Utc::now();

        self.db()
            .conn()
            .execute(
                "INSERT INTO projects (id, name, owner_id, usage, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![id.as_str(), name, owner_id, usage.as_str(), now.to_rfc3339()],
            )
            .await
            .map_err(|e| map_conflict("project", name, e))?;

        Ok(Project {
            id,
            name: name.to_string(),
            owner_id: owner_id.to_string(),
            usage,
            created_at: now,
        })
    }

    pub async fn find_project_by_name(&self, name: &str) -> Result<Option<Project>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {PROJECT_COLS} FROM projects WHERE name = ?1"),
                [name],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {PROJECT_COLS} FROM projects ORDER BY name"),
                (),
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_project(&row)?);
        }
        Ok(results)
    }

    /// Projects the given account may see: everything for admins, otherwise
    /// owned projects plus public ones. Always a fresh read, so creations
    /// performed earlier in the same session are reflected.
    pub async fn list_visible_projects(&self, user: &User) -> Result<Vec<Project>, StoreError> {
        if user.is_admin {
            return self.list_projects().await;
        }
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {PROJECT_COLS} FROM projects
                     WHERE owner_id = ?1 OR usage = 'public' ORDER BY name"
                ),
                [user.id.as_str()],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_project(&row)?);
        }
        Ok(results)
    }

    /// Whether the account may read the project at all.
    #[must_use]
    pub fn project_visible(user: &User, project: &Project) -> bool {
        user.is_admin || project.owner_id == user.id || project.usage == Usage::Public
    }

    pub async fn set_project_usage(&self, id: &str, usage: Usage) -> Result<(), StoreError> {
        let affected = self
            .db()
            .conn()
            .execute(
                "UPDATE projects SET usage = ?2 WHERE id = ?1",
                libsql::params![id, usage.as_str()],
            )
            .await?;
        if affected == 0 {
            return Err(StoreError::NotFound {
                entity: "project",
                name: id.to_string(),
            });
        }
        Ok(())
    }
}
