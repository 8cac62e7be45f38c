//! Catalog record types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::split_list;

/// The closed set of catalog partitions.
///
/// Each one is a table in the catalog store. `Doujinshi` records are
/// classified as doujinshi in the output metadata; the rest are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogCategory {
    General,
    Doujinshi,
    Books,
    Other,
}

impl CatalogCategory {
    /// Title-key priority: earlier categories win key collisions.
    pub const PRIORITY: [CatalogCategory; 4] = [
        CatalogCategory::Books,
        CatalogCategory::Doujinshi,
        CatalogCategory::General,
        CatalogCategory::Other,
    ];

    /// Backing table name.
    pub fn table(&self) -> &'static str {
        match self {
            CatalogCategory::General => "content",
            CatalogCategory::Doujinshi => "doujin",
            CatalogCategory::Books => "books",
            CatalogCategory::Other => "other",
        }
    }

    pub fn is_doujinshi_class(&self) -> bool {
        matches!(self, CatalogCategory::Doujinshi)
    }
}

/// One canonical catalog entry.
///
/// List-shaped fields (`artists`, `parodies`, `circles`, `magazine`,
/// `language`, `translator`, `tags`) hold comma-joined strings exactly as
/// stored; use the `*_list` accessors for the parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub category: Option<CatalogCategory>,
    pub url: String,
    pub title: String,
    pub author: String,
    pub artists: String,
    pub parodies: String,
    pub circles: String,
    pub publisher: String,
    pub event: String,
    pub magazine: String,
    pub language: String,
    pub translator: String,
    pub tags: String,
    pub color: String,
    pub censorship: String,
    pub description: String,
}

impl CatalogRecord {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// The credit shown in `[...]` filenames: artists, else author.
    pub fn credit(&self) -> &str {
        if !self.artists.trim().is_empty() {
            self.artists.trim()
        } else {
            self.author.trim()
        }
    }

    pub fn artist_list(&self) -> Vec<String> {
        split_list(&self.artists)
    }

    pub fn parody_list(&self) -> Vec<String> {
        split_list(&self.parodies)
    }

    pub fn magazine_list(&self) -> Vec<String> {
        split_list(&self.magazine)
    }

    pub fn is_doujinshi_class(&self) -> bool {
        self.category.is_some_and(|c| c.is_doujinshi_class())
    }
}

/// Errors from the catalog store.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
