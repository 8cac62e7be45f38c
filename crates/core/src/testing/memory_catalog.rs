//! In-memory catalog store for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::catalog::{CatalogCategory, CatalogError, CatalogRecord, CatalogStore};

/// Catalog store holding records per category in memory.
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    records: Mutex<HashMap<CatalogCategory, Vec<CatalogRecord>>>,
    fail: Mutex<bool>,
}

impl MemoryCatalogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to a category.
    pub fn add(&self, category: CatalogCategory, record: CatalogRecord) {
        self.records
            .lock()
            .unwrap()
            .entry(category)
            .or_default()
            .push(record);
    }

    /// Makes every query fail, like an unreadable database.
    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn query_all(&self, category: CatalogCategory) -> Result<Vec<CatalogRecord>, CatalogError> {
        if *self.fail.lock().unwrap() {
            return Err(CatalogError::Database("simulated failure".to_string()));
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&category)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::load_all;

    #[test]
    fn test_load_all_tags_category() {
        let store = MemoryCatalogStore::new();
        store.add(CatalogCategory::Other, CatalogRecord::new("o", "Other"));
        store.add(CatalogCategory::Books, CatalogRecord::new("b", "Book"));

        let records = load_all(&store).unwrap();
        assert_eq!(records[0].category, Some(CatalogCategory::Books));
        assert_eq!(records[1].category, Some(CatalogCategory::Other));
    }

    #[test]
    fn test_failing_store() {
        let store = MemoryCatalogStore::new();
        store.set_failing(true);
        assert!(load_all(&store).is_err());
    }
}
