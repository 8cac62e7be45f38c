//! Error types for the reorganizer module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur relocating a file.
///
/// None of these are fatal for a run.
#[derive(Debug, Error)]
pub enum RelocateError {
    /// Something already lives at the destination. Both files are untouched.
    #[error("Duplicate file: [{from}] already exists at [{to}]")]
    DuplicateDestination { from: PathBuf, to: PathBuf },

    /// Source file not found.
    #[error("Source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Failed to create destination directory.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to copy file.
    #[error("Unable to copy [{from}] to [{to}]")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to move file.
    #[error("Unable to move [{from}] to [{to}]")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Copied bytes differ from the source.
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// An empty directory could not be removed.
    #[error("Unable to remove directory: {path}")]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RelocateError {
    pub fn copy_failed(from: PathBuf, to: PathBuf, error: std::io::Error) -> Self {
        Self::CopyFailed { from, to, error }
    }

    pub fn move_failed(from: PathBuf, to: PathBuf, error: std::io::Error) -> Self {
        Self::MoveFailed { from, to, error }
    }

    /// Whether the destination was occupied, as opposed to a filesystem failure.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateDestination { .. })
    }
}
