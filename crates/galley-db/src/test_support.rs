//! Shared test utilities for galley-db and downstream crates' tests.

use crate::GalleyDb;
use crate::service::GalleyService;

/// Create an in-memory service (schema migrated, empty tables).
///
/// # Panics
///
/// Panics if the in-memory database cannot be opened; test-only code.
pub async fn test_service() -> GalleyService {
    let db = GalleyDb::open_local(":memory:").await.unwrap();
    GalleyService::from_db(db)
}

/// Create an in-memory service plus a regular account, for tests that need
/// an owner identity.
///
/// # Panics
///
/// Panics on store errors; test-only code.
pub async fn test_service_with_user(name: &str) -> (GalleyService, galley_core::entities::User) {
    let svc = test_service().await;
    let user = svc.create_user(name, false).await.unwrap();
    (svc, user)
}
