//! In-memory archive store for testing.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::archive::{ArchiveError, ArchiveStore};

type Entries = Vec<(String, Vec<u8>)>;

/// Archive store keeping every archive as an ordered entry list in memory.
///
/// Provides controllable behavior for testing:
/// - Seed archives with [`Self::insert_archive`]
/// - Make writes to one path fail with [`Self::fail_writes_for`]
/// - Count successful writes
///
/// # Example
///
/// ```rust,ignore
/// use comicshelf_core::testing::MemoryArchiveStore;
///
/// let store = MemoryArchiveStore::new();
/// store.insert_archive(Path::new("/lib/a.cbz"), &[("001.png", b"img")]);
/// store.fail_writes_for(Path::new("/lib/a.cbz"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryArchiveStore {
    archives: Mutex<HashMap<PathBuf, Entries>>,
    failing: Mutex<HashSet<PathBuf>>,
    writes: Mutex<usize>,
}

impl MemoryArchiveStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an archive.
    pub fn insert_archive(&self, path: &Path, entries: &[(&str, &[u8])]) {
        let entries = entries
            .iter()
            .map(|(name, bytes)| (name.to_string(), bytes.to_vec()))
            .collect();
        self.archives
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), entries);
    }

    /// Every later `replace_entry` on `path` fails.
    pub fn fail_writes_for(&self, path: &Path) {
        self.failing.lock().unwrap().insert(path.to_path_buf());
    }

    /// Number of successful `replace_entry` calls.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    /// Whether an archive exists at `path`.
    pub fn contains(&self, path: &Path) -> bool {
        self.archives.lock().unwrap().contains_key(path)
    }

    fn open_error(path: &Path) -> ArchiveError {
        ArchiveError::Open {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such archive"),
        }
    }
}

impl ArchiveStore for MemoryArchiveStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn list_entries(&self, path: &Path) -> Result<Vec<String>, ArchiveError> {
        let archives = self.archives.lock().unwrap();
        let entries = archives.get(path).ok_or_else(|| Self::open_error(path))?;
        Ok(entries.iter().map(|(name, _)| name.clone()).collect())
    }

    fn read_entry(&self, path: &Path, name: &str) -> Result<Vec<u8>, ArchiveError> {
        let archives = self.archives.lock().unwrap();
        let entries = archives.get(path).ok_or_else(|| Self::open_error(path))?;
        entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| ArchiveError::EntryNotFound {
                path: path.to_path_buf(),
                name: name.to_string(),
            })
    }

    fn replace_entry(&self, path: &Path, name: &str, bytes: &[u8]) -> Result<(), ArchiveError> {
        if self.failing.lock().unwrap().contains(path) {
            return Err(ArchiveError::write_failed(path, "simulated write failure"));
        }

        let mut archives = self.archives.lock().unwrap();
        let entries = archives
            .get_mut(path)
            .ok_or_else(|| Self::open_error(path))?;
        entries.retain(|(n, _)| n != name);
        entries.push((name.to_string(), bytes.to_vec()));
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_archive_is_open_error() {
        let store = MemoryArchiveStore::new();
        let err = store.list_entries(Path::new("/nope.cbz")).unwrap_err();
        assert!(matches!(err, ArchiveError::Open { .. }));
    }

    #[test]
    fn test_replace_keeps_other_entries_in_order() {
        let store = MemoryArchiveStore::new();
        let path = Path::new("/a.cbz");
        store.insert_archive(path, &[("a", b"1"), ("b", b"2"), ("c", b"3")]);
        store.replace_entry(path, "b", b"new").unwrap();

        assert_eq!(store.list_entries(path).unwrap(), vec!["a", "c", "b"]);
        assert_eq!(store.read_entry(path, "b").unwrap(), b"new");
        assert_eq!(store.write_count(), 1);
    }
}
