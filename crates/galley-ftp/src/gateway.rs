//! The virtual filesystem gateway.
//!
//! Translates each filesystem command plus the session into store
//! operations and a protocol reply. Dispatch is a match over the closed
//! [`Target`] enum, one arm per path depth, and every arm produces a reply
//! value — there is no branch that can fall through without responding.
//!
//! Authorization failures reply exactly like missing paths (550) so that
//! the existence of other accounts' projects never leaks; the two cases are
//! told apart only in the debug log.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use galley_core::entities::Project;
use galley_core::enums::{DataKind, Tab, Usage};
use galley_db::error::StoreError;
use galley_db::repos::analysis::NewAnalysis;
use galley_db::service::GalleyService;
use tracing::{debug, error, info};

use crate::reply::Reply;
use crate::session::SessionContext;
use crate::vpath::{Segments, Target};

/// One line of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub is_dir: bool,
}

impl ListEntry {
    fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }

    fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }
}

/// Protocol-facing translator from filesystem commands to store operations.
pub struct Gateway {
    svc: Arc<GalleyService>,
    store_root: PathBuf,
}

impl Gateway {
    #[must_use]
    pub fn new(svc: Arc<GalleyService>, store_root: impl Into<PathBuf>) -> Self {
        Self {
            svc,
            store_root: store_root.into(),
        }
    }

    /// Handle MKD. Depth picks the creation rule; the project case extends
    /// what the session sees because visibility is a live read.
    pub async fn mkd(&self, session: &SessionContext, path_arg: &str) -> Reply {
        let segments = session.parse(path_arg);
        match self.try_mkd(session, &segments).await {
            Ok(reply) | Err(reply) => reply,
        }
    }

    async fn try_mkd(
        &self,
        session: &SessionContext,
        segments: &Segments,
    ) -> Result<Reply, Reply> {
        let canonical = segments.canonical();
        match segments.target() {
            Target::Root => Ok(Reply::rejected("Cannot create the root directory.")),

            Target::Project { root } => {
                if !safe_segment(root) {
                    return Ok(Reply::rejected("Invalid directory name."));
                }
                let owner = session.current_user();
                match self
                    .svc
                    .create_project(root, &owner.id, Usage::User)
                    .await
                {
                    Ok(project) => {
                        info!(project = %project.name, owner = %owner.name, "created project");
                        Ok(Reply::dir_created(&canonical))
                    }
                    Err(err) => Ok(self.store_reply(&canonical, err)),
                }
            }

            Target::Collection { root, tab } => {
                self.resolve_visible_project(session, root, &canonical)
                    .await?;
                // Collections always exist under a project; nothing to create.
                if tab.is_some() {
                    Ok(Reply::already_exists())
                } else {
                    Ok(Reply::not_found(&canonical))
                }
            }

            Target::Entry { root, tab, name } => {
                let project = self
                    .resolve_visible_project(session, root, &canonical)
                    .await?;
                if !safe_segment(name) {
                    return Ok(Reply::rejected("Invalid directory name."));
                }
                match tab {
                    Some(Tab::Analyses) => Ok(self
                        .create_analysis_placeholder(&project, name, &canonical)
                        .await),
                    Some(Tab::Data) => Ok(self
                        .create_data_placeholder(&project, name, &canonical)
                        .await),
                    Some(Tab::Jobs) => {
                        Ok(Reply::rejected("Jobs cannot be created from the file tree."))
                    }
                    None => Ok(Reply::not_found(&canonical)),
                }
            }

            Target::Nested {
                root, tab, name, ..
            } => {
                let project = self
                    .resolve_visible_project(session, root, &canonical)
                    .await?;
                // Not a domain-creating event; acknowledge only below an
                // existing entity.
                if self.entity_exists(&project, tab, name).await {
                    Ok(Reply::dir_created(&canonical))
                } else {
                    Ok(Reply::not_found(&canonical))
                }
            }
        }
    }

    /// Handle STOR: the payload has already been received and lands under
    /// the store root; the data entry records where.
    pub async fn stor(&self, session: &SessionContext, path_arg: &str, payload: &[u8]) -> Reply {
        let segments = session.parse(path_arg);
        match self.try_stor(session, &segments, payload).await {
            Ok(reply) | Err(reply) => reply,
        }
    }

    async fn try_stor(
        &self,
        session: &SessionContext,
        segments: &Segments,
        payload: &[u8],
    ) -> Result<Reply, Reply> {
        let canonical = segments.canonical();
        let (root, tab, name, tail) = match segments.target() {
            Target::Entry { root, tab, name } => (root, tab, name, ""),
            Target::Nested {
                root,
                tab,
                name,
                tail,
            } => (root, tab, name, tail),
            _ => return Ok(Reply::rejected("Files can only be stored under a data entry.")),
        };
        if tab != Some(Tab::Data) {
            return Ok(Reply::rejected("Files can only be stored under a data entry."));
        }
        if !safe_segment(name) || tail.split('/').any(|s| s == "..") {
            return Ok(Reply::rejected("Invalid file name."));
        }

        let project = self
            .resolve_visible_project(session, root, &canonical)
            .await?;

        if tail.is_empty() {
            let dest = self.store_root.join(&project.id).join(name);
            write_payload(&dest, payload).await.map_err(|err| {
                error!(path = %dest.display(), %err, "failed to write upload");
                Reply::local_error()
            })?;
            let kind = DataKind::from_path(name);
            match self
                .svc
                .upsert_data(&project.id, name, &dest.to_string_lossy(), kind, None)
                .await
            {
                Ok((entry, replaced)) => {
                    info!(data = %entry.name, project = %project.name, replaced, "stored data");
                    let verb = if replaced { "updated" } else { "created" };
                    Ok(Reply::new(226, format!("Transfer complete; data {verb}.")))
                }
                Err(err) => Ok(self.store_reply(&canonical, err)),
            }
        } else {
            // Nested deposit: the parent entry must already exist; its
            // record keeps its path and kind, only the content grows.
            let Some(entry) = self
                .svc
                .find_data_by_name(&project.id, name)
                .await
                .map_err(|e| self.store_reply(&canonical, e))?
            else {
                return Ok(Reply::not_found(&canonical));
            };
            let dest = self.store_root.join(&project.id).join(name).join(tail);
            write_payload(&dest, payload).await.map_err(|err| {
                error!(path = %dest.display(), %err, "failed to write upload");
                Reply::local_error()
            })?;
            match self
                .svc
                .upsert_data(&project.id, name, &entry.path, entry.kind, entry.metadata.as_ref())
                .await
            {
                Ok(_) => Ok(Reply::new(226, "Transfer complete; data updated.")),
                Err(err) => Ok(self.store_reply(&canonical, err)),
            }
        }
    }

    /// Handle LIST: child names for the resolved position, purely derived
    /// from store reads.
    pub async fn list(
        &self,
        session: &SessionContext,
        path_arg: &str,
    ) -> Result<Vec<ListEntry>, Reply> {
        let segments = session.parse(path_arg);
        let canonical = segments.canonical();
        match segments.target() {
            Target::Root => {
                let projects = session
                    .visible_projects(&self.svc)
                    .await
                    .map_err(|e| self.store_reply(&canonical, e))?;
                Ok(projects
                    .into_iter()
                    .map(|p| ListEntry::dir(p.name))
                    .collect())
            }

            Target::Project { root } => {
                self.resolve_visible_project(session, root, &canonical)
                    .await?;
                Ok(Tab::ALL.iter().map(|t| ListEntry::dir(t.as_str())).collect())
            }

            Target::Collection { root, tab } => {
                let project = self
                    .resolve_visible_project(session, root, &canonical)
                    .await?;
                match tab {
                    Some(Tab::Analyses) => {
                        let analyses = self
                            .svc
                            .list_analyses(&project.id)
                            .await
                            .map_err(|e| self.store_reply(&canonical, e))?;
                        Ok(analyses
                            .into_iter()
                            .map(|a| ListEntry::dir(a.name))
                            .collect())
                    }
                    Some(Tab::Jobs) => {
                        let jobs = self
                            .svc
                            .list_jobs(&project.id)
                            .await
                            .map_err(|e| self.store_reply(&canonical, e))?;
                        Ok(jobs.into_iter().map(|j| ListEntry::dir(j.id)).collect())
                    }
                    Some(Tab::Data) => {
                        let data = self
                            .svc
                            .list_data(&project.id)
                            .await
                            .map_err(|e| self.store_reply(&canonical, e))?;
                        Ok(data
                            .into_iter()
                            .map(|d| {
                                if d.kind == DataKind::Directory {
                                    ListEntry::dir(d.name)
                                } else {
                                    ListEntry::file(d.name)
                                }
                            })
                            .collect())
                    }
                    None => Err(Reply::not_found(&canonical)),
                }
            }

            Target::Entry { root, tab, name } => {
                let project = self
                    .resolve_visible_project(session, root, &canonical)
                    .await?;
                if tab == Some(Tab::Data) {
                    let Some(entry) = self
                        .svc
                        .find_data_by_name(&project.id, name)
                        .await
                        .map_err(|e| self.store_reply(&canonical, e))?
                    else {
                        return Err(Reply::not_found(&canonical));
                    };
                    if entry.kind == DataKind::Directory {
                        return list_stored_files(&entry.path).await.map_err(|err| {
                            error!(path = %entry.path, %err, "failed to read data directory");
                            Reply::local_error()
                        });
                    }
                    return Ok(vec![ListEntry::file(entry.name)]);
                }
                if self.entity_exists(&project, tab, name).await {
                    Ok(Vec::new())
                } else {
                    Err(Reply::not_found(&canonical))
                }
            }

            Target::Nested { .. } => Err(Reply::not_found(&canonical)),
        }
    }

    /// Handle CWD: navigation only, but the target must exist and be
    /// visible.
    pub async fn cwd(&self, session: &mut SessionContext, path_arg: &str) -> Reply {
        let segments = session.parse(path_arg);
        let canonical = segments.canonical();
        let ok = match segments.target() {
            Target::Root => true,
            Target::Project { root } => self
                .resolve_visible_project(session, root, &canonical)
                .await
                .is_ok(),
            Target::Collection { root, tab } => {
                tab.is_some()
                    && self
                        .resolve_visible_project(session, root, &canonical)
                        .await
                        .is_ok()
            }
            Target::Entry { root, tab, name } => {
                match self
                    .resolve_visible_project(session, root, &canonical)
                    .await
                {
                    Ok(project) => self.entity_exists(&project, tab, name).await,
                    Err(_) => false,
                }
            }
            Target::Nested { .. } => false,
        };
        if ok {
            session.set_cwd(canonical.clone());
            Reply::action_ok(format!("Directory changed to {canonical}."))
        } else {
            Reply::not_found(&canonical)
        }
    }

    async fn create_analysis_placeholder(
        &self,
        project: &Project,
        name: &str,
        canonical: &str,
    ) -> Reply {
        let result = self
            .svc
            .create_analysis(NewAnalysis {
                project_id: &project.id,
                name,
                summary: "",
                help_text: "",
                spec_text: "",
                template: "",
                usage: project.usage,
            })
            .await;
        match result {
            Ok(analysis) => {
                info!(analysis = %analysis.name, project = %project.name, "created analysis");
                Reply::dir_created(canonical)
            }
            Err(err) => self.store_reply(canonical, err),
        }
    }

    async fn create_data_placeholder(
        &self,
        project: &Project,
        name: &str,
        canonical: &str,
    ) -> Reply {
        let dir = self.store_root.join(&project.id).join(name);
        if let Err(err) = tokio::fs::create_dir_all(&dir).await {
            error!(path = %dir.display(), %err, "failed to create data directory");
            return Reply::local_error();
        }
        let result = self
            .svc
            .create_data(
                &project.id,
                name,
                &dir.to_string_lossy(),
                DataKind::Directory,
                None,
            )
            .await;
        match result {
            Ok(entry) => {
                info!(data = %entry.name, project = %project.name, "created data directory");
                Reply::dir_created(canonical)
            }
            Err(err) => self.store_reply(canonical, err),
        }
    }

    /// Look up a project and require the session to see it. A hidden project
    /// replies exactly like a missing one.
    async fn resolve_visible_project(
        &self,
        session: &SessionContext,
        name: &str,
        canonical: &str,
    ) -> Result<Project, Reply> {
        match self.svc.find_project_by_name(name).await {
            Ok(Some(project)) => {
                if GalleyService::project_visible(session.current_user(), &project) {
                    Ok(project)
                } else {
                    debug!(
                        project = name,
                        user = %session.current_user().name,
                        "denied access to project; replying not-found"
                    );
                    Err(Reply::not_found(canonical))
                }
            }
            Ok(None) => Err(Reply::not_found(canonical)),
            Err(err) => Err(self.store_reply(canonical, err)),
        }
    }

    async fn entity_exists(&self, project: &Project, tab: Option<Tab>, name: &str) -> bool {
        match tab {
            Some(Tab::Analyses) => matches!(
                self.svc.find_analysis_by_name(&project.id, name).await,
                Ok(Some(_))
            ),
            Some(Tab::Data) => matches!(
                self.svc.find_data_by_name(&project.id, name).await,
                Ok(Some(_))
            ),
            Some(Tab::Jobs) => match self.svc.find_job(name).await {
                Ok(Some(job)) => job.project_id == project.id,
                _ => false,
            },
            None => false,
        }
    }

    fn store_reply(&self, canonical: &str, err: StoreError) -> Reply {
        match err {
            StoreError::AlreadyExists { .. } => Reply::already_exists(),
            StoreError::NotFound { .. } => Reply::not_found(canonical),
            StoreError::Unresolved { path } => {
                Reply::rejected(format!("Backing path does not resolve: {path}."))
            }
            err => {
                error!(%err, "store operation failed");
                Reply::local_error()
            }
        }
    }
}

/// Files deposited under a directory-backed data entry, name-ordered.
async fn list_stored_files(dir: &str) -> std::io::Result<Vec<ListEntry>> {
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    while let Some(item) = read_dir.next_entry().await? {
        let name = item.file_name().to_string_lossy().into_owned();
        if item.file_type().await?.is_dir() {
            entries.push(ListEntry::dir(name));
        } else {
            entries.push(ListEntry::file(name));
        }
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

async fn write_payload(dest: &Path, payload: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(dest, payload).await
}

/// Segments that may become filesystem components. `..` never may.
fn safe_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != ".."
}
