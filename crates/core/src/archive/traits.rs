//! Trait definitions for the archive module.

use std::path::Path;

use super::error::ArchiveError;

/// Entry-level access to packaged archive files.
///
/// Calls are blocking; async callers run them on a blocking task.
pub trait ArchiveStore: Send + Sync {
    /// Returns the name of this implementation.
    fn name(&self) -> &str;

    /// Entry names in container order.
    fn list_entries(&self, path: &Path) -> Result<Vec<String>, ArchiveError>;

    /// Full contents of one entry.
    fn read_entry(&self, path: &Path, name: &str) -> Result<Vec<u8>, ArchiveError>;

    /// Replaces (or adds) one entry.
    ///
    /// Every other entry must come out byte-for-byte identical, and on
    /// failure the archive must be left exactly as it was.
    fn replace_entry(&self, path: &Path, name: &str, bytes: &[u8]) -> Result<(), ArchiveError>;
}
