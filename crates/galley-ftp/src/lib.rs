//! # galley-ftp
//!
//! The protocol-facing half of Galley: a small FTP command subset (login,
//! list, make-directory, store-file) whose directory tree is not a
//! filesystem but the Project → Analysis/Job/Data domain tree.
//!
//! Directory creation and file deposit are authoritative commands: MKD at
//! the root creates a project, MKD under a project's `analyses` or `data`
//! tab creates the named entity, STOR deposits a file and records a data
//! entry. Every command terminates in exactly one well-formed reply —
//! malformed paths and store conflicts become negative replies, never
//! session-killing faults.

pub mod auth;
pub mod error;
pub mod gateway;
pub mod reply;
pub mod server;
pub mod session;
pub mod vpath;

pub use auth::{Authenticator, TokenAuthenticator};
pub use error::FtpError;
pub use gateway::{Gateway, ListEntry};
pub use reply::Reply;
pub use server::FtpServer;
pub use session::SessionContext;
