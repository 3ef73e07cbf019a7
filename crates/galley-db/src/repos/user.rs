//! User account repository.

use chrono::Utc;

use galley_core::entities::User;
use galley_core::ids::PREFIX_USER;

use crate::error::{StoreError, map_conflict};
use crate::helpers::parse_datetime;
use crate::service::GalleyService;

const USER_COLS: &str = "id, name, is_admin, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, StoreError> {
    Ok(User {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        is_admin: row.get::<i64>(2)? != 0,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

impl GalleyService {
    /// Create an account. Names are globally unique.
    ///
    /// # Errors
    ///
    /// `StoreError::AlreadyExists` on a name collision.
    pub async fn create_user(&self, name: &str, is_admin: bool) -> Result<User, StoreError> {
        let id = self.db().generate_id(PREFIX_USER).await?;
        let now = Utc::now();

        self.db()
            .conn()
            .execute(
                "INSERT INTO users (id, name, is_admin, created_at) VALUES (?1, ?2, ?3, ?4)",
                libsql::params![id.as_str(), name, i64::from(is_admin), now.to_rfc3339()],
            )
            .await
            .map_err(|e| map_conflict("user", name, e))?;

        Ok(User {
            id,
            name: name.to_string(),
            is_admin,
            created_at: now,
        })
    }

    pub async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {USER_COLS} FROM users WHERE name = ?1"),
                [name],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {USER_COLS} FROM users ORDER BY name"), ())
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_user(&row)?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::StoreError;
    use crate::test_support::test_service;

    #[tokio::test]
    async fn create_and_find_user() {
        let svc = test_service().await;
        let user = svc.create_user("alice", false).await.unwrap();
        assert!(user.id.starts_with("usr-"));

        let found = svc.find_user_by_name("alice").await.unwrap().unwrap();
        assert_eq!(found, user);
        assert!(svc.find_user_by_name("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_user_name_rejected() {
        let svc = test_service().await;
        svc.create_user("alice", false).await.unwrap();
        let err = svc.create_user("alice", true).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { entity: "user", .. }));
    }

    #[tokio::test]
    async fn list_users_ordered() {
        let svc = test_service().await;
        for name in ["carol", "alice", "bob"] {
            svc.create_user(name, false).await.unwrap();
        }
        let names: Vec<String> = svc
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, ["alice", "bob", "carol"]);
    }
}
