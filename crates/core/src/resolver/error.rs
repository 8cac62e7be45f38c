//! Error types for the resolver module.

use std::path::PathBuf;
use thiserror::Error;

/// A file that could not be matched. Never fatal for a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No tier produced a catalog record.
    #[error("Unable to find content: {path}")]
    NotFound { path: PathBuf },

    /// The file's magazine is not in the catalog.
    #[error("Unable to detect magazine {magazine}: {path}")]
    UnknownMagazine { path: PathBuf, magazine: String },

    /// The magazine is known but none of its issues has this title.
    #[error("Unable to find content: {path}. Issue name: [{expected}]")]
    IssueNotFound { path: PathBuf, expected: String },
}

impl ResolveError {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::NotFound { path }
            | Self::UnknownMagazine { path, .. }
            | Self::IssueNotFound { path, .. } => path,
        }
    }
}
