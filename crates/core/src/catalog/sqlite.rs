//! SQLite-backed catalog store.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, Row};

use super::{CatalogCategory, CatalogError, CatalogRecord, CatalogStore};

const COLUMNS: &str = "url, title, author, artists, parodies, circles, publisher, event, \
                       magazine, language, translator, tags, color, censorship, description";

/// SQLite-backed catalog store, one table per [`CatalogCategory`].
pub struct SqliteCatalogStore {
    conn: Mutex<Connection>,
}

impl SqliteCatalogStore {
    /// Open a catalog database, creating missing tables.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        for category in CatalogCategory::PRIORITY {
            let sql = format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    url TEXT,
                    title TEXT,
                    author TEXT,
                    cover TEXT,
                    artists TEXT,
                    parodies TEXT,
                    circles TEXT,
                    publisher TEXT,
                    event TEXT,
                    magazine TEXT,
                    language TEXT,
                    translator TEXT,
                    tags TEXT,
                    color TEXT,
                    censorship TEXT,
                    description TEXT
                );
                "#,
                table = category.table()
            );
            conn.execute_batch(&sql)
                .map_err(|e| CatalogError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Insert a record into the table of `category`.
    pub fn insert(
        &self,
        category: CatalogCategory,
        record: &CatalogRecord,
    ) -> Result<(), CatalogError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| CatalogError::Internal(e.to_string()))?;

        let sql = format!(
            "INSERT INTO {} ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            category.table()
        );
        conn.execute(
            &sql,
            params![
                record.url,
                record.title,
                record.author,
                record.artists,
                record.parodies,
                record.circles,
                record.publisher,
                record.event,
                record.magazine,
                record.language,
                record.translator,
                record.tags,
                record.color,
                record.censorship,
                record.description,
            ],
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;
        Ok(())
    }

    fn row_to_record(row: &Row<'_>, category: CatalogCategory) -> rusqlite::Result<CatalogRecord> {
        let text = |idx: usize| -> rusqlite::Result<String> {
            Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
        };
        Ok(CatalogRecord {
            category: Some(category),
            url: text(0)?,
            title: text(1)?,
            author: text(2)?,
            artists: text(3)?,
            parodies: text(4)?,
            circles: text(5)?,
            publisher: text(6)?,
            event: text(7)?,
            magazine: text(8)?,
            language: text(9)?,
            translator: text(10)?,
            tags: text(11)?,
            color: text(12)?,
            censorship: text(13)?,
            description: text(14)?,
        })
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn query_all(&self, category: CatalogCategory) -> Result<Vec<CatalogRecord>, CatalogError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| CatalogError::Internal(e.to_string()))?;

        let sql = format!("SELECT {COLUMNS} FROM {} ORDER BY id", category.table());
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| Self::row_to_record(row, category))
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(|e| CatalogError::Database(e.to_string()))?);
        }
        Ok(records)
    }
}
