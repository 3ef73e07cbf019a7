//! Login seam.
//!
//! Credential verification belongs to an external system; Galley only
//! depends on this trait. The shipped implementation resolves the account
//! through the store and compares the password against the configured
//! service token.

use std::future::Future;
use std::sync::Arc;

use galley_core::entities::User;
use galley_db::error::StoreError;
use galley_db::service::GalleyService;
use tracing::debug;

/// Resolves a login attempt to an account. `Ok(None)` means rejected —
/// unknown account and bad credential are indistinguishable to the caller.
pub trait Authenticator: Send + Sync {
    fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;
}

/// Shared-token authenticator: every known account logs in with the one
/// service token. An empty configured token disables login entirely.
pub struct TokenAuthenticator {
    svc: Arc<GalleyService>,
    service_token: String,
}

impl TokenAuthenticator {
    #[must_use]
    pub fn new(svc: Arc<GalleyService>, service_token: impl Into<String>) -> Self {
        Self {
            svc,
            service_token: service_token.into(),
        }
    }
}

impl Authenticator for TokenAuthenticator {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, StoreError> {
        if self.service_token.is_empty() || password != self.service_token {
            debug!(user = username, "rejected login: bad credential");
            return Ok(None);
        }
        let user = self.svc.find_user_by_name(username).await?;
        if user.is_none() {
            debug!(user = username, "rejected login: unknown account");
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use galley_db::service::GalleyService;

    use super::{Authenticator, TokenAuthenticator};

    #[tokio::test]
    async fn token_must_match_and_user_must_exist() {
        let svc = Arc::new(GalleyService::open(":memory:").await.unwrap());
        svc.create_user("alice", false).await.unwrap();
        let auth = TokenAuthenticator::new(Arc::clone(&svc), "sekrit");

        let user = auth.authenticate("alice", "sekrit").await.unwrap();
        assert_eq!(user.unwrap().name, "alice");

        assert!(auth.authenticate("alice", "wrong").await.unwrap().is_none());
        assert!(auth.authenticate("mallory", "sekrit").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_token_disables_login() {
        let svc = Arc::new(GalleyService::open(":memory:").await.unwrap());
        svc.create_user("alice", false).await.unwrap();
        let auth = TokenAuthenticator::new(svc, "");

        assert!(auth.authenticate("alice", "").await.unwrap().is_none());
    }
}
