//! In-memory lookup structures over the loaded catalog.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tracing::{debug, info};

use super::CatalogRecord;
use crate::normalize::{normalize_magazine_key, CorrectionTables, TitleNormalizer};

/// Errors building a [`CatalogIndex`].
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Catalog is empty, nothing to match against")]
    EmptyCatalog,
}

/// Settings that shape how keys are derived.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Magazine value used by the self-published storefront; never a magazine.
    pub self_published_alias: String,
    pub corrections: CorrectionTables,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            self_published_alias: "FAKKU".to_string(),
            corrections: CorrectionTables::default(),
        }
    }
}

/// Counters collected while building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub records: usize,
    pub skipped: usize,
    pub url_keys: usize,
    pub title_keys_with_author: usize,
    pub title_keys_without_author: usize,
    pub magazines: usize,
}

/// Read-only lookup maps over the catalog, built once per run.
///
/// Title maps are first-wins on key collisions, so callers feed records in
/// category priority order. They are `BTreeMap`s so iteration (and with it
/// the fuzzy tie-break) follows the natural key order.
#[derive(Debug)]
pub struct CatalogIndex {
    records: Vec<CatalogRecord>,
    by_url: HashMap<String, usize>,
    by_title_with_author: BTreeMap<String, usize>,
    by_title_without_author: BTreeMap<String, usize>,
    by_magazine_name: HashMap<String, Vec<usize>>,
    stats: IndexStats,
}

impl CatalogIndex {
    /// Builds the index with default options.
    pub fn build(records: &[CatalogRecord]) -> Result<Self, IndexError> {
        Self::build_with(records, &IndexOptions::default())
    }

    /// Builds the index. Records without a URL are skipped and counted.
    pub fn build_with(records: &[CatalogRecord], options: &IndexOptions) -> Result<Self, IndexError> {
        if records.is_empty() {
            return Err(IndexError::EmptyCatalog);
        }

        let normalizer = TitleNormalizer::new(&options.corrections);
        let mut index = Self {
            records: Vec::with_capacity(records.len()),
            by_url: HashMap::new(),
            by_title_with_author: BTreeMap::new(),
            by_title_without_author: BTreeMap::new(),
            by_magazine_name: HashMap::new(),
            stats: IndexStats::default(),
        };

        for record in records {
            let url = url_key(&record.url);
            if url.is_empty() {
                debug!(title = %record.title, "skipping catalog record without url");
                index.stats.skipped += 1;
                continue;
            }

            let idx = index.records.len();
            index.records.push(record.clone());
            index.by_url.entry(url).or_insert(idx);

            let (with_author, without_author) = title_keys(&normalizer, record);
            if !with_author.is_empty() {
                index.by_title_with_author.entry(with_author).or_insert(idx);
            }
            if !without_author.is_empty() {
                index
                    .by_title_without_author
                    .entry(without_author)
                    .or_insert(idx);
            }

            if let Some(name) = magazine_group(record, options) {
                index.by_magazine_name.entry(name).or_default().push(idx);
            }
        }

        index.stats.records = index.records.len();
        index.stats.url_keys = index.by_url.len();
        index.stats.title_keys_with_author = index.by_title_with_author.len();
        index.stats.title_keys_without_author = index.by_title_without_author.len();
        index.stats.magazines = index.by_magazine_name.len();

        info!(
            records = index.stats.records,
            skipped = index.stats.skipped,
            magazines = index.stats.magazines,
            "Catalog index built"
        );

        Ok(index)
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exact, case-insensitive URL lookup.
    pub fn by_url(&self, url: &str) -> Option<&CatalogRecord> {
        self.by_url.get(&url_key(url)).map(|&i| &self.records[i])
    }

    pub fn by_title_with_author(&self, key: &str) -> Option<&CatalogRecord> {
        self.by_title_with_author.get(key).map(|&i| &self.records[i])
    }

    pub fn by_title_without_author(&self, key: &str) -> Option<&CatalogRecord> {
        self.by_title_without_author
            .get(key)
            .map(|&i| &self.records[i])
    }

    /// Without-author keys and their records, in key order.
    pub fn title_keys_without_author(&self) -> impl Iterator<Item = (&str, &CatalogRecord)> {
        self.by_title_without_author
            .iter()
            .map(|(k, &i)| (k.as_str(), &self.records[i]))
    }

    /// All issues of one magazine, in catalog order.
    pub fn by_magazine_name(&self, name: &str) -> Option<Vec<&CatalogRecord>> {
        self.by_magazine_name
            .get(&name.trim().to_lowercase())
            .map(|ids| ids.iter().map(|&i| &self.records[i]).collect())
    }

    pub fn has_magazine(&self, name: &str) -> bool {
        self.by_magazine_name
            .contains_key(&name.trim().to_lowercase())
    }
}

fn url_key(url: &str) -> String {
    url.trim().to_lowercase()
}

/// With-author and without-author keys for a record.
///
/// Both are derived from `[credit] title` so that records and filenames go
/// through the exact same normalization.
fn title_keys(normalizer: &TitleNormalizer, record: &CatalogRecord) -> (String, String) {
    let credit = record.credit();
    if credit.is_empty() {
        let key = normalizer.normalize(&record.title, true);
        return (key.clone(), key);
    }
    let credited = format!("[{}] {}", credit, record.title);
    (
        normalizer.normalize(&credited, true),
        normalizer.normalize(&credited, false),
    )
}

fn magazine_group(record: &CatalogRecord, options: &IndexOptions) -> Option<String> {
    let first = record.magazine.split(',').next()?.trim();
    if first.is_empty()
        || first.eq_ignore_ascii_case(&options.self_published_alias)
        || options.corrections.is_ignored_magazine(first)
    {
        return None;
    }
    normalize_magazine_key(first).map(|key| key.name_key())
}
