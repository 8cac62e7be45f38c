//! Zip/CBZ archive store.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::error::ArchiveError;
use super::traits::ArchiveStore;

/// Archive store backed by the `zip` crate.
///
/// `replace_entry` writes a sibling temporary file, raw-copies every other
/// entry into it without recompressing, appends the new entry and then
/// renames the temporary file over the original.
#[derive(Debug, Clone, Default)]
pub struct ZipArchiveStore;

impl ZipArchiveStore {
    pub fn new() -> Self {
        Self
    }

    fn open(path: &Path) -> Result<ZipArchive<File>, ArchiveError> {
        let file = File::open(path).map_err(|e| ArchiveError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;
        ZipArchive::new(file).map_err(|e| ArchiveError::corrupt(path, e))
    }
}

impl ArchiveStore for ZipArchiveStore {
    fn name(&self) -> &str {
        "zip"
    }

    fn list_entries(&self, path: &Path) -> Result<Vec<String>, ArchiveError> {
        let mut archive = Self::open(path)?;
        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let entry = archive
                .by_index_raw(i)
                .map_err(|e| ArchiveError::corrupt(path, e))?;
            names.push(entry.name().to_string());
        }
        Ok(names)
    }

    fn read_entry(&self, path: &Path, name: &str) -> Result<Vec<u8>, ArchiveError> {
        let mut archive = Self::open(path)?;
        let mut entry = archive.by_name(name).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => ArchiveError::EntryNotFound {
                path: path.to_path_buf(),
                name: name.to_string(),
            },
            other => ArchiveError::corrupt(path, other),
        })?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| ArchiveError::corrupt(path, e))?;
        Ok(bytes)
    }

    fn replace_entry(&self, path: &Path, name: &str, bytes: &[u8]) -> Result<(), ArchiveError> {
        let mut archive = Self::open(path)?;
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp = tempfile::Builder::new()
            .prefix(".comicshelf-")
            .suffix(".tmp")
            .tempfile_in(parent)
            .map_err(|e| ArchiveError::write_failed(path, e))?;

        {
            let mut writer = ZipWriter::new(temp.as_file_mut());
            let mut replaced = false;
            for i in 0..archive.len() {
                let entry = archive
                    .by_index_raw(i)
                    .map_err(|e| ArchiveError::corrupt(path, e))?;
                if entry.name() == name {
                    replaced = true;
                    continue;
                }
                writer
                    .raw_copy_file(entry)
                    .map_err(|e| ArchiveError::write_failed(path, e))?;
            }

            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            writer
                .start_file(name, options)
                .map_err(|e| ArchiveError::write_failed(path, e))?;
            writer
                .write_all(bytes)
                .map_err(|e| ArchiveError::write_failed(path, e))?;
            writer
                .finish()
                .map_err(|e| ArchiveError::write_failed(path, e))?;

            debug!(archive = %path.display(), entry = name, replaced, "Rewrote archive entry");
        }

        if let Ok(meta) = fs::metadata(path) {
            let _ = temp.as_file().set_permissions(meta.permissions());
        }
        temp.as_file()
            .sync_all()
            .map_err(|e| ArchiveError::write_failed(path, e))?;
        temp.persist(path)
            .map_err(|e| ArchiveError::write_failed(path, e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::write_zip;
    use tempfile::TempDir;

    #[test]
    fn test_list_and_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.cbz");
        write_zip(&path, &[("001.png", b"img1"), ("info.yaml", b"Title: A")]);

        let store = ZipArchiveStore::new();
        assert_eq!(store.list_entries(&path).unwrap(), vec!["001.png", "info.yaml"]);
        assert_eq!(store.read_entry(&path, "info.yaml").unwrap(), b"Title: A");
    }

    #[test]
    fn test_read_missing_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.cbz");
        write_zip(&path, &[("001.png", b"img1")]);

        let err = ZipArchiveStore::new().read_entry(&path, "nope").unwrap_err();
        assert!(matches!(err, ArchiveError::EntryNotFound { .. }));
    }

    #[test]
    fn test_replace_adds_entry_and_preserves_others() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.cbz");
        write_zip(&path, &[("001.png", b"img1"), ("002.png", b"img2")]);

        let store = ZipArchiveStore::new();
        store.replace_entry(&path, "book_info.json", b"{}").unwrap();

        assert_eq!(
            store.list_entries(&path).unwrap(),
            vec!["001.png", "002.png", "book_info.json"]
        );
        assert_eq!(store.read_entry(&path, "001.png").unwrap(), b"img1");
        assert_eq!(store.read_entry(&path, "002.png").unwrap(), b"img2");
        assert_eq!(store.read_entry(&path, "book_info.json").unwrap(), b"{}");
    }

    #[test]
    fn test_replace_overwrites_existing_entry_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.cbz");
        write_zip(&path, &[("book_info.json", b"old"), ("001.png", b"img1")]);

        let store = ZipArchiveStore::new();
        store.replace_entry(&path, "book_info.json", b"new").unwrap();

        let entries = store.list_entries(&path).unwrap();
        assert_eq!(entries.iter().filter(|e| *e == "book_info.json").count(), 1);
        assert_eq!(store.read_entry(&path, "book_info.json").unwrap(), b"new");
        assert_eq!(store.read_entry(&path, "001.png").unwrap(), b"img1");
    }

    #[test]
    fn test_replace_on_corrupt_archive_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.cbz");
        std::fs::write(&path, b"definitely not a zip").unwrap();

        let err = ZipArchiveStore::new()
            .replace_entry(&path, "book_info.json", b"{}")
            .unwrap_err();
        assert!(matches!(err, ArchiveError::Corrupt { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), b"definitely not a zip");

        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }
}
