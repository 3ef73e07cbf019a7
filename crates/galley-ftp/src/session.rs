//! Per-connection session state.
//!
//! A session is created by a successful login and dies with the connection.
//! It carries the authenticated account and the virtual working directory —
//! nothing shared across sessions lives here, so sessions need no
//! synchronization among themselves.

use galley_core::entities::{Project, User};
use galley_db::error::StoreError;
use galley_db::service::GalleyService;

use crate::vpath::Segments;

/// State for one authenticated protocol session.
#[derive(Debug)]
pub struct SessionContext {
    user: User,
    cwd: String,
}

impl SessionContext {
    /// Start a session at the tree root.
    #[must_use]
    pub const fn new(user: User) -> Self {
        Self {
            user,
            cwd: String::new(),
        }
    }

    #[must_use]
    pub const fn current_user(&self) -> &User {
        &self.user
    }

    /// Current virtual working directory, canonical form.
    #[must_use]
    pub fn cwd(&self) -> String {
        if self.cwd.is_empty() {
            "/".to_string()
        } else {
            self.cwd.clone()
        }
    }

    pub fn set_cwd(&mut self, canonical: String) {
        self.cwd = if canonical == "/" {
            String::new()
        } else {
            canonical
        };
    }

    /// Resolve a command argument against the working directory. Absolute
    /// arguments stand alone; relative ones append to `cwd`.
    #[must_use]
    pub fn resolve(&self, arg: &str) -> String {
        if arg.starts_with('/') {
            arg.to_string()
        } else if arg.is_empty() {
            self.cwd()
        } else {
            format!("{}/{arg}", self.cwd)
        }
    }

    /// Projects this session may see, as a live store read. A project the
    /// session created moments ago is visible here without any session-side
    /// bookkeeping.
    pub async fn visible_projects(
        &self,
        svc: &GalleyService,
    ) -> Result<Vec<Project>, StoreError> {
        svc.list_visible_projects(&self.user).await
    }

    /// Resolve-and-parse in one step, since every command does both.
    #[must_use]
    pub fn parse(&self, arg: &str) -> Segments {
        Segments::parse(&self.resolve(arg))
    }
}
