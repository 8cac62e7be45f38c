//! Catalog of canonical records.
//!
//! The store is an external row source queried in bulk once per run; the
//! [`CatalogIndex`] turns the loaded rows into read-only lookup maps.

mod index;
mod sqlite;
mod types;

pub use index::{CatalogIndex, IndexError, IndexOptions, IndexStats};
pub use sqlite::SqliteCatalogStore;
pub use types::*;

/// Bulk read access to a catalog partitioned by category.
pub trait CatalogStore: Send + Sync {
    /// All records of one category, in storage order.
    fn query_all(&self, category: CatalogCategory) -> Result<Vec<CatalogRecord>, CatalogError>;
}

/// Loads every category in title-key priority order.
pub fn load_all(store: &dyn CatalogStore) -> Result<Vec<CatalogRecord>, CatalogError> {
    let mut records = Vec::new();
    for category in CatalogCategory::PRIORITY {
        let mut batch = store.query_all(category)?;
        tracing::debug!(category = ?category, count = batch.len(), "Loaded catalog category");
        for record in &mut batch {
            record.category.get_or_insert(category);
        }
        records.append(&mut batch);
    }
    Ok(records)
}
