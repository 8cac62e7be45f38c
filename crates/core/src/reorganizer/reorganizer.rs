//! Computes destinations and relocates files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::error::RelocateError;
use super::layout::Layout;
use super::traits::FileMover;
use super::types::{CleanupReport, MigrationMode, PlacementInput, RelocatedFile, ResortMode};

/// Places files below one output root.
///
/// Relocation and rename are a single move to the final path.
#[derive(Clone)]
pub struct Reorganizer {
    layout: Layout,
    mover: Arc<dyn FileMover>,
    output_root: PathBuf,
    migration: MigrationMode,
}

impl Reorganizer {
    pub fn new(
        layout: Layout,
        mover: Arc<dyn FileMover>,
        output_root: impl Into<PathBuf>,
        migration: MigrationMode,
    ) -> Self {
        Self {
            layout,
            mover,
            output_root: output_root.into(),
            migration,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Absolute destination for a file, without touching the filesystem.
    pub fn plan(&self, input: &PlacementInput<'_>, resort: ResortMode) -> PathBuf {
        self.output_root
            .join(self.layout.relative_path(input, resort))
    }

    /// Moves (or copies) the file to its destination.
    pub async fn place(
        &self,
        input: &PlacementInput<'_>,
        resort: ResortMode,
    ) -> Result<RelocatedFile, RelocateError> {
        let destination = self.plan(input, resort);
        let relocated = self
            .mover
            .relocate(&input.file.path, &destination, self.migration)
            .await?;
        debug!(
            from = %relocated.source.display(),
            to = %relocated.destination.display(),
            classification = ?self.layout.classify(input),
            "placed"
        );
        Ok(relocated)
    }

    /// Removes `dirs` (and emptied ancestors below `root`) once empty.
    pub async fn cleanup(&self, dirs: &[PathBuf], root: &Path) -> CleanupReport {
        self.mover.remove_empty_parents(dirs, root).await
    }
}

impl std::fmt::Debug for Reorganizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reorganizer")
            .field("layout", &self.layout)
            .field("mover", &self.mover.name())
            .field("output_root", &self.output_root)
            .field("migration", &self.migration)
            .finish()
    }
}
