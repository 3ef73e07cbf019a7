//! Server error types for galley-ftp.

use thiserror::Error;

/// Errors that terminate a listener or a single session's connection.
/// Command-level failures never surface here; they become protocol replies.
#[derive(Debug, Error)]
pub enum FtpError {
    /// Socket I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
