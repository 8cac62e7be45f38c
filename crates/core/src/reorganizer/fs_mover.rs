//! File system mover implementation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, warn};

use super::config::ReorganizerConfig;
use super::error::RelocateError;
use super::traits::FileMover;
use super::types::{CleanupReport, MigrationMode, RelocatedFile};

/// File system based mover.
///
/// Moves try a hard link followed by unlinking the source, which fails
/// instead of replacing an existing destination. Anything else is a
/// `create_new` copy.
pub struct FsMover {
    config: ReorganizerConfig,
}

impl FsMover {
    pub fn new(config: ReorganizerConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ReorganizerConfig::default())
    }

    /// Link-and-unlink move. `Ok(false)` means fall back to copying.
    async fn try_atomic_move(source: &Path, destination: &Path) -> Result<bool, RelocateError> {
        match fs::hard_link(source, destination).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(RelocateError::DuplicateDestination {
                    from: source.to_path_buf(),
                    to: destination.to_path_buf(),
                });
            }
            Err(e) => {
                debug!(error = %e, "hard link unavailable, copying instead");
                return Ok(false);
            }
        }

        if let Err(e) = fs::remove_file(source).await {
            // Undo the link so the file is not left in two places.
            let _ = fs::remove_file(destination).await;
            return Err(RelocateError::move_failed(
                source.to_path_buf(),
                destination.to_path_buf(),
                e,
            ));
        }
        Ok(true)
    }

    /// Copies into a newly created destination, hashing when verification is on.
    async fn copy_file(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<(u64, Option<String>), RelocateError> {
        let source_file = File::open(source).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                RelocateError::SourceNotFound {
                    path: source.to_path_buf(),
                }
            } else {
                RelocateError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            }
        })?;

        let dest_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(destination)
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::AlreadyExists {
                    RelocateError::DuplicateDestination {
                        from: source.to_path_buf(),
                        to: destination.to_path_buf(),
                    }
                } else {
                    RelocateError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
                }
            })?;

        let result = self.copy_contents(source_file, dest_file).await;
        match result {
            Ok(done) => Ok(done),
            Err(e) => {
                let _ = fs::remove_file(destination).await;
                Err(RelocateError::copy_failed(
                    source.to_path_buf(),
                    destination.to_path_buf(),
                    e,
                ))
            }
        }
    }

    async fn copy_contents(
        &self,
        source: File,
        destination: File,
    ) -> Result<(u64, Option<String>), std::io::Error> {
        let mut reader = BufReader::with_capacity(self.config.buffer_size, source);
        let mut writer = BufWriter::with_capacity(self.config.buffer_size, destination);
        let mut hasher = self.config.verify_checksums.then(Sha256::new);

        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; self.config.buffer_size.max(1)];
        loop {
            let bytes_read = reader.read(&mut buffer).await?;
            if bytes_read == 0 {
                break;
            }
            if let Some(ref mut h) = hasher {
                h.update(&buffer[..bytes_read]);
            }
            writer.write_all(&buffer[..bytes_read]).await?;
            total_bytes += bytes_read as u64;
        }
        writer.flush().await?;
        writer.get_ref().sync_all().await?;

        Ok((total_bytes, hasher.map(|h| format!("{:x}", h.finalize()))))
    }

    async fn sha256_of(&self, path: &Path) -> Result<String, std::io::Error> {
        let file = File::open(path).await?;
        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut buffer = vec![0u8; self.config.buffer_size.max(1)];
        let mut hasher = Sha256::new();
        loop {
            let bytes_read = reader.read(&mut buffer).await?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }
        Ok(format!("{:x}", hasher.finalize()))
    }

    async fn verify_copy(
        &self,
        destination: &Path,
        expected: &str,
    ) -> Result<(), RelocateError> {
        let actual = self.sha256_of(destination).await.map_err(|e| {
            RelocateError::copy_failed(destination.to_path_buf(), destination.to_path_buf(), e)
        })?;
        if actual != expected {
            let _ = fs::remove_file(destination).await;
            return Err(RelocateError::ChecksumMismatch {
                path: destination.to_path_buf(),
                expected: expected.to_string(),
                actual,
            });
        }
        Ok(())
    }

    async fn ensure_parent_dir(&self, path: &Path) -> Result<(), RelocateError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| RelocateError::DirectoryCreationFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }
}

#[async_trait]
impl FileMover for FsMover {
    fn name(&self) -> &str {
        "fs"
    }

    async fn relocate(
        &self,
        source: &Path,
        destination: &Path,
        mode: MigrationMode,
    ) -> Result<RelocatedFile, RelocateError> {
        let meta = fs::metadata(source).await.map_err(|_| RelocateError::SourceNotFound {
            path: source.to_path_buf(),
        })?;

        if source == destination {
            return Ok(RelocatedFile {
                source: source.to_path_buf(),
                destination: destination.to_path_buf(),
                size_bytes: meta.len(),
                checksum: None,
                unchanged: true,
            });
        }

        if fs::symlink_metadata(destination).await.is_ok() {
            return Err(RelocateError::DuplicateDestination {
                from: source.to_path_buf(),
                to: destination.to_path_buf(),
            });
        }

        self.ensure_parent_dir(destination).await?;

        if mode == MigrationMode::Move
            && self.config.prefer_atomic_moves
            && Self::try_atomic_move(source, destination).await?
        {
            debug!(from = %source.display(), to = %destination.display(), "moved");
            return Ok(RelocatedFile {
                source: source.to_path_buf(),
                destination: destination.to_path_buf(),
                size_bytes: meta.len(),
                checksum: None,
                unchanged: false,
            });
        }

        let (size_bytes, checksum) = self.copy_file(source, destination).await?;
        if let Some(expected) = checksum.as_deref() {
            self.verify_copy(destination, expected).await?;
        }

        if mode == MigrationMode::Move {
            if let Err(e) = fs::remove_file(source).await {
                // The copy is complete; leave it and report the stale source.
                return Err(RelocateError::move_failed(
                    source.to_path_buf(),
                    destination.to_path_buf(),
                    e,
                ));
            }
        }

        debug!(from = %source.display(), to = %destination.display(), ?mode, "copied");
        Ok(RelocatedFile {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            size_bytes,
            checksum,
            unchanged: false,
        })
    }

    async fn remove_empty_parents(&self, dirs: &[PathBuf], root: &Path) -> CleanupReport {
        let dirs = dirs.to_vec();
        let root = root.to_path_buf();
        match tokio::task::spawn_blocking(move || remove_empty_parents_blocking(&dirs, &root)).await
        {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "Cleanup task failed");
                CleanupReport::default()
            }
        }
    }
}

fn remove_empty_parents_blocking(dirs: &[PathBuf], root: &Path) -> CleanupReport {
    let mut report = CleanupReport::default();

    // Deepest first, so siblings are gone before their parent is checked.
    let mut starts: Vec<&Path> = dirs
        .iter()
        .map(PathBuf::as_path)
        .filter(|dir| dir.starts_with(root) && *dir != root)
        .collect();
    starts.sort_by_key(|dir| std::cmp::Reverse(dir.components().count()));
    starts.dedup();

    for start in starts {
        let mut current = Some(start);
        while let Some(dir) = current.filter(|d| *d != root && d.starts_with(root)) {
            let is_empty = match std::fs::read_dir(dir) {
                Ok(mut entries) => entries.next().is_none(),
                // Already removed through another start.
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    current = dir.parent();
                    continue;
                }
                Err(e) => {
                    report.failures.push(RelocateError::CleanupFailed {
                        path: dir.to_path_buf(),
                        source: e,
                    });
                    break;
                }
            };
            if !is_empty {
                break;
            }
            if let Err(e) = std::fs::remove_dir(dir) {
                report.failures.push(RelocateError::CleanupFailed {
                    path: dir.to_path_buf(),
                    source: e,
                });
                break;
            }
            debug!(path = %dir.display(), "Removed empty directory");
            report.removed += 1;
            current = dir.parent();
        }
    }
    report
}
