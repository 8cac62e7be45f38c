//! Attaches synthesized metadata to archives.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use super::error::ArchiveError;
use super::traits::ArchiveStore;
use crate::metadata::OutputMetadata;

/// Default entry name of the output document inside an archive.
pub const DEFAULT_METADATA_ENTRY: &str = "book_info.json";

/// Writes [`OutputMetadata`] into one well-known archive entry.
///
/// Attaching never moves, renames or deletes the archive itself.
#[derive(Clone)]
pub struct ArchiveMetadataWriter {
    store: Arc<dyn ArchiveStore>,
    entry_name: String,
}

impl ArchiveMetadataWriter {
    pub fn new(store: Arc<dyn ArchiveStore>, entry_name: impl Into<String>) -> Self {
        Self {
            store,
            entry_name: entry_name.into(),
        }
    }

    pub fn with_defaults(store: Arc<dyn ArchiveStore>) -> Self {
        Self::new(store, DEFAULT_METADATA_ENTRY)
    }

    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }

    pub fn store(&self) -> &Arc<dyn ArchiveStore> {
        &self.store
    }

    /// Replaces the metadata entry with `metadata`, leaving all others alone.
    pub fn attach(&self, path: &Path, metadata: &OutputMetadata) -> Result<(), ArchiveError> {
        let bytes = metadata.to_json_bytes()?;
        self.store.replace_entry(path, &self.entry_name, &bytes)?;
        debug!(
            archive = %path.display(),
            entry = %self.entry_name,
            store = self.store.name(),
            "Attached metadata"
        );
        Ok(())
    }

    /// Reads back a previously attached document, if any.
    ///
    /// A missing entry is `Ok(None)`. An unparsable one is logged and also
    /// treated as absent so the file is processed again.
    pub fn read_prior(&self, path: &Path) -> Result<Option<OutputMetadata>, ArchiveError> {
        let bytes = match self.store.read_entry(path, &self.entry_name) {
            Ok(bytes) => bytes,
            Err(ArchiveError::EntryNotFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        match OutputMetadata::from_json_bytes(&bytes) {
            Ok(meta) => Ok(Some(meta)),
            Err(e) => {
                warn!(archive = %path.display(), error = %e, "Ignoring unreadable prior metadata");
                Ok(None)
            }
        }
    }
}

impl std::fmt::Debug for ArchiveMetadataWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveMetadataWriter")
            .field("store", &self.store.name())
            .field("entry_name", &self.entry_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryArchiveStore;
    use std::path::PathBuf;

    fn metadata(title: &str) -> OutputMetadata {
        OutputMetadata {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_attach_replaces_only_metadata_entry() {
        let store = Arc::new(MemoryArchiveStore::new());
        let path = PathBuf::from("/lib/a.cbz");
        store.insert_archive(&path, &[("001.png", b"img"), ("book_info.json", b"{}")]);

        let writer = ArchiveMetadataWriter::with_defaults(store.clone());
        writer.attach(&path, &metadata("Sample")).unwrap();

        assert_eq!(store.read_entry(&path, "001.png").unwrap(), b"img");
        let prior = writer.read_prior(&path).unwrap().unwrap();
        assert_eq!(prior.title.as_deref(), Some("Sample"));
        assert_eq!(store.list_entries(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_read_prior_missing_entry() {
        let store = Arc::new(MemoryArchiveStore::new());
        let path = PathBuf::from("/lib/a.cbz");
        store.insert_archive(&path, &[("001.png", b"img")]);

        let writer = ArchiveMetadataWriter::with_defaults(store);
        assert!(writer.read_prior(&path).unwrap().is_none());
    }

    #[test]
    fn test_read_prior_garbage_is_absent() {
        let store = Arc::new(MemoryArchiveStore::new());
        let path = PathBuf::from("/lib/a.cbz");
        store.insert_archive(&path, &[("book_info.json", b"not json")]);

        let writer = ArchiveMetadataWriter::with_defaults(store);
        assert!(writer.read_prior(&path).unwrap().is_none());
    }

    #[test]
    fn test_attach_failure_is_reported() {
        let store = Arc::new(MemoryArchiveStore::new());
        let path = PathBuf::from("/lib/a.cbz");
        store.insert_archive(&path, &[("001.png", b"img")]);
        store.fail_writes_for(&path);

        let writer = ArchiveMetadataWriter::with_defaults(store.clone());
        let err = writer.attach(&path, &metadata("Sample")).unwrap_err();
        assert!(matches!(err, ArchiveError::WriteFailed { .. }));
        assert_eq!(store.list_entries(&path).unwrap(), vec!["001.png"]);
    }
}
