//! Typed error taxonomy for the synchronization core.
//!
//! Core modules ([`sync`](crate::sync), [`backup`](crate::backup)) return
//! [`SyncError`]; command handlers at the CLI boundary convert to
//! [`anyhow::Error`] through the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! SyncError
//! ├── Configuration : unrecognized mapping category
//! ├── NotFound      : source path absent (skip for copy, SOURCE_MISSING for diff)
//! ├── Io            : I/O failure on a path
//! └── Parse         : backup directory name or manifest that cannot be read back
//! ```
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by path resolution, copying, diffing, and the backup store.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A mapping names a category other than `files`, `config`, or `bin`.
    #[error("unknown mapping category '{0}': expected one of files, config, bin")]
    Configuration(String),

    /// The source of an operation does not exist.
    #[error("source not found: {}", .0.display())]
    NotFound(PathBuf),

    /// An I/O operation failed on `path`.
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        /// Short verb phrase describing the attempted operation.
        action: &'static str,
        /// Path the operation was acting on.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A persisted artifact could not be parsed.
    #[error("cannot parse {what}: {reason}")]
    Parse {
        /// What was being parsed (e.g. a backup directory name).
        what: String,
        /// Human-readable reason for the failure.
        reason: String,
    },
}

impl SyncError {
    /// Build a [`SyncError::Parse`] from any displayable pieces.
    pub fn parse(what: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` for [`SyncError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Convenience alias used throughout the core.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Attach the attempted action and path to a raw [`io::Result`].
pub(crate) trait IoContext<T> {
    /// Convert an [`io::Error`] into [`SyncError::Io`].
    fn io_context(self, action: &'static str, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn io_context(self, action: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| SyncError::Io {
            action,
            path: path.to_path_buf(),
            source,
        })
    }
}
