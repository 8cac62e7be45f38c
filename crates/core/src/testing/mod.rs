//! Testing utilities and test doubles for unit and integration tests.
//!
//! This module provides in-memory implementations of the collaborator
//! traits plus helpers for building real zip archives on disk, so the whole
//! pipeline can run against a temporary directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use comicshelf_core::testing::{fixtures, write_zip, MemoryCatalogStore};
//!
//! let store = MemoryCatalogStore::new();
//! store.add(CatalogCategory::Doujinshi, fixtures::record("http://x/a", "Sample", "Jane"));
//! write_zip(&dir.join("a.cbz"), &[("info.yaml", b"URL: http://x/a\n")]);
//! ```

mod memory_archive;
mod memory_catalog;
mod mock_mover;

pub use memory_archive::MemoryArchiveStore;
pub use memory_catalog::MemoryCatalogStore;
pub use mock_mover::{MockFileMover, RecordedRelocation};

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Writes a zip archive with the given entries, creating parent directories.
///
/// Panics on I/O errors; meant for test setup only.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, bytes) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap();
}

/// Reads one entry of a zip archive, `None` when the entry is missing.
///
/// Panics when the archive itself cannot be opened.
pub fn read_zip_entry_opt(path: &Path, name: &str) -> Option<Vec<u8>> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entry = archive.by_name(name).ok()?;
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).unwrap();
    Some(bytes)
}

/// Reads one entry of a zip archive, panicking when it is missing.
pub fn read_zip_entry(path: &Path, name: &str) -> Vec<u8> {
    read_zip_entry_opt(path, name)
        .unwrap_or_else(|| panic!("entry {name} missing from {}", path.display()))
}

/// Entry names of a zip archive in container order.
pub fn zip_entry_names(path: &Path) -> Vec<String> {
    let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    archive.file_names().map(str::to_string).collect()
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{CatalogCategory, CatalogRecord};

    /// A doujinshi record with a single author.
    pub fn record(url: &str, title: &str, author: &str) -> CatalogRecord {
        CatalogRecord {
            author: author.to_string(),
            category: Some(CatalogCategory::Doujinshi),
            ..CatalogRecord::new(url, title)
        }
    }

    /// A record published in one magazine issue, e.g. `Comic X Vol.1`.
    pub fn magazine_record(url: &str, title: &str, author: &str, magazine: &str) -> CatalogRecord {
        CatalogRecord {
            author: author.to_string(),
            magazine: magazine.to_string(),
            category: Some(CatalogCategory::General),
            ..CatalogRecord::new(url, title)
        }
    }

    /// Sidecar YAML pointing at `url`.
    pub fn sidecar_yaml(url: &str) -> Vec<u8> {
        format!("URL: {url}\n").into_bytes()
    }
}
