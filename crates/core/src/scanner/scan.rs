//! Directory scanning.

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::types::FileRecord;
use crate::archive::{ArchiveError, ArchiveMetadataWriter};
use crate::metadata::{is_sidecar_entry, Sidecar};
use crate::metrics;

/// Archive extensions picked up by the scanner.
const ARCHIVE_EXTENSIONS: &[&str] = &["cbz", "zip"];

/// Errors scanning the input directory.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Root path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Root path exists but is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A blocking read task panicked or was cancelled.
    #[error("Scan task failed: {0}")]
    TaskFailed(String),
}

/// Read-only scanner producing [`FileRecord`]s.
///
/// Directory traversal is sequential; reading sidecars and prior metadata
/// runs on blocking tasks with at most `parallelism` in flight.
#[derive(Debug, Clone)]
pub struct ArchiveScanner {
    writer: ArchiveMetadataWriter,
    parallelism: usize,
}

impl ArchiveScanner {
    pub fn new(writer: ArchiveMetadataWriter, parallelism: usize) -> Self {
        Self {
            writer,
            parallelism: parallelism.max(1),
        }
    }

    /// Scans `root` recursively, returning records sorted by path.
    pub async fn scan_directory(&self, root: &Path) -> Result<Vec<FileRecord>, ScanError> {
        let paths = list_archives(root)?;
        debug!(root = %root.display(), count = paths.len(), "Found archives");

        let results: Vec<Result<FileRecord, ScanError>> = stream::iter(paths)
            .map(|path| {
                let writer = self.writer.clone();
                async move {
                    tokio::task::spawn_blocking(move || read_file_record(&writer, path))
                        .await
                        .map_err(|e| ScanError::TaskFailed(e.to_string()))
                }
            })
            .buffered(self.parallelism)
            .collect()
            .await;

        let records = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        info!(
            root = %root.display(),
            files = records.len(),
            with_sidecar = records.iter().filter(|r| r.sidecar.is_some()).count(),
            with_prior = records.iter().filter(|r| r.prior.is_some()).count(),
            "Scan complete"
        );
        Ok(records)
    }
}

/// Every `.cbz`/`.zip` below `root`, sorted.
pub fn list_archives(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !root.exists() {
        return Err(ScanError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Error accessing entry");
                continue;
            }
        };
        if entry.file_type().is_file() && is_archive(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths)
}

fn is_archive(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'));
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    !hidden && ext.is_some_and(|e| ARCHIVE_EXTENSIONS.contains(&e.as_str()))
}

/// Reads sidecar and prior metadata of one archive.
///
/// Unreadable parts are logged and left empty; the file is still returned.
fn read_file_record(writer: &ArchiveMetadataWriter, path: PathBuf) -> FileRecord {
    let mut record = FileRecord::new(path);

    metrics::FILES_SCANNED.inc();
    match read_sidecar(writer, &record.path) {
        Ok(sidecar) => {
            let result = if sidecar.is_some() { "found" } else { "missing" };
            metrics::SIDECAR_READS.with_label_values(&[result]).inc();
            record.sidecar = sidecar;
        }
        Err(e) => {
            metrics::SIDECAR_READS.with_label_values(&["failed"]).inc();
            warn!(file = %record.path.display(), error = %e, "Unable to read sidecar");
        }
    }
    match writer.read_prior(&record.path) {
        Ok(prior) => record.prior = prior,
        Err(e) => warn!(file = %record.path.display(), error = %e, "Unable to read prior metadata"),
    }
    record
}

fn read_sidecar(writer: &ArchiveMetadataWriter, path: &Path) -> Result<Option<Sidecar>, String> {
    let store = writer.store();
    let entries = store.list_entries(path).map_err(|e| e.to_string())?;
    let Some(entry) = entries.iter().find(|name| is_sidecar_entry(name)) else {
        return Ok(None);
    };
    let bytes = store
        .read_entry(path, entry)
        .map_err(|e: ArchiveError| e.to_string())?;
    Sidecar::parse(&bytes).map(Some).map_err(|e| e.to_string())
}
