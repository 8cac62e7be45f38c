//! Trait definitions for the reorganizer module.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::error::RelocateError;
use super::types::{CleanupReport, MigrationMode, RelocatedFile};

/// Moves or copies one file without ever replacing an existing one.
#[async_trait]
pub trait FileMover: Send + Sync {
    /// Returns the name of this mover implementation.
    fn name(&self) -> &str;

    /// Relocates `source` to `destination`, creating parent directories.
    ///
    /// An occupied destination yields [`RelocateError::DuplicateDestination`]
    /// and leaves both files as they were.
    async fn relocate(
        &self,
        source: &Path,
        destination: &Path,
        mode: MigrationMode,
    ) -> Result<RelocatedFile, RelocateError>;

    /// Removes each of `dirs`, then its ancestors, while they are empty.
    ///
    /// Stops at `root`, which is never removed; directories outside `root`
    /// are ignored.
    async fn remove_empty_parents(&self, dirs: &[PathBuf], root: &Path) -> CleanupReport;
}
