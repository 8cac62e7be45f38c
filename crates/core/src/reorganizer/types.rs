//! Types for the reorganizer module.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::metadata::OutputMetadata;
use crate::normalize::MagazineKey;
use crate::scanner::FileRecord;

/// What happens to the source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationMode {
    /// The source is removed once the destination is complete.
    #[default]
    Move,
    /// The source stays where it is.
    Copy,
}

/// How non-magazine files are grouped below their top-level folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResortMode {
    #[default]
    ByPublisher,
    ByAuthor,
}

/// Top-level folder a file lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Magazine,
    Doujinshi,
    /// Original (non-parody) work.
    Book,
}

impl Classification {
    pub fn folder(&self) -> &'static str {
        match self {
            Self::Magazine => "Magazines",
            Self::Doujinshi => "Doujins",
            Self::Book => "Books",
        }
    }
}

/// Everything the layout needs to know about one file.
#[derive(Debug, Clone, Copy)]
pub struct PlacementInput<'a> {
    pub file: &'a FileRecord,
    /// The metadata attached (or previously attached) to the file.
    pub metadata: &'a OutputMetadata,
    pub magazine: Option<&'a MagazineKey>,
    pub publisher: Option<&'a str>,
}

/// A completed relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocatedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub size_bytes: u64,
    /// SHA-256 of the copied bytes, when verification ran.
    pub checksum: Option<String>,
    /// True when source and destination were already the same path.
    pub unchanged: bool,
}

/// Outcome of removing empty directories.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: usize,
    pub failures: Vec<super::RelocateError>,
}
