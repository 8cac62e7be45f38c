//! Error types for the archive module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur reading or rewriting an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The archive could not be opened.
    #[error("Failed to open archive {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The container is unreadable or malformed.
    #[error("Corrupt archive {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// The requested entry does not exist.
    #[error("Entry {name} not found in {path}")]
    EntryNotFound { path: PathBuf, name: String },

    /// Rewriting the archive failed; the original is untouched.
    #[error("Failed to write archive {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// The metadata document could not be serialized.
    #[error("Failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ArchiveError {
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn write_failed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::WriteFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
