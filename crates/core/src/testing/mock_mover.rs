//! Mock file mover for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::reorganizer::{CleanupReport, FileMover, MigrationMode, RelocateError, RelocatedFile};

/// A recorded relocation for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRelocation {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub mode: MigrationMode,
    /// Whether the relocation succeeded.
    pub success: bool,
}

/// Mock implementation of the FileMover trait.
///
/// Never touches the filesystem. Destinations handed out once count as
/// occupied, so a second relocation to the same path is a duplicate.
///
/// # Example
///
/// ```rust,ignore
/// use comicshelf_core::testing::MockFileMover;
///
/// let mover = MockFileMover::new();
/// mover.set_fail_all(true).await;
/// ```
#[derive(Debug, Default)]
pub struct MockFileMover {
    relocations: Arc<RwLock<Vec<RecordedRelocation>>>,
    fail_all: Arc<RwLock<bool>>,
}

impl MockFileMover {
    /// Create a new mock mover.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded relocations.
    pub async fn recorded_relocations(&self) -> Vec<RecordedRelocation> {
        self.relocations.read().await.clone()
    }

    /// Make every relocation fail with a filesystem error.
    pub async fn set_fail_all(&self, fail: bool) {
        *self.fail_all.write().await = fail;
    }
}

#[async_trait]
impl FileMover for MockFileMover {
    fn name(&self) -> &str {
        "mock"
    }

    async fn relocate(
        &self,
        source: &Path,
        destination: &Path,
        mode: MigrationMode,
    ) -> Result<RelocatedFile, RelocateError> {
        let mut relocations = self.relocations.write().await;
        let occupied = relocations
            .iter()
            .any(|r| r.success && r.destination == destination);

        let result = if *self.fail_all.read().await {
            Err(RelocateError::move_failed(
                source.to_path_buf(),
                destination.to_path_buf(),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "simulated failure"),
            ))
        } else if occupied {
            Err(RelocateError::DuplicateDestination {
                from: source.to_path_buf(),
                to: destination.to_path_buf(),
            })
        } else {
            Ok(RelocatedFile {
                source: source.to_path_buf(),
                destination: destination.to_path_buf(),
                size_bytes: 0,
                checksum: None,
                unchanged: source == destination,
            })
        };

        relocations.push(RecordedRelocation {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            mode,
            success: result.is_ok(),
        });
        result
    }

    async fn remove_empty_parents(&self, _dirs: &[PathBuf], _root: &Path) -> CleanupReport {
        CleanupReport::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_second_relocation_to_same_path_is_duplicate() {
        let mover = MockFileMover::new();
        let to = Path::new("/out/a.cbz");
        mover
            .relocate(Path::new("/in/a.cbz"), to, MigrationMode::Move)
            .await
            .unwrap();
        let err = mover
            .relocate(Path::new("/in/b.cbz"), to, MigrationMode::Move)
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(mover.recorded_relocations().await.len(), 2);
    }

    #[tokio::test]
    async fn test_fail_all() {
        let mover = MockFileMover::new();
        mover.set_fail_all(true).await;
        let err = mover
            .relocate(Path::new("/in/a.cbz"), Path::new("/out/a.cbz"), MigrationMode::Copy)
            .await
            .unwrap_err();
        assert!(!err.is_duplicate());
    }
}
