//! SQLite-backed product catalog.
//!
//! Parsed products the user decides to keep land in a single `products`
//! table. The store is a thin collaborator around the parsing core: it
//! accepts and returns [`ProductRecord`]s and knows nothing about how they
//! were extracted.

use rusqlite::Connection;
use serde_derive::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::ParsedProduct;

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Database id; `None` until the record has been inserted
    pub id: Option<i64>,
    pub url: String,
    pub title: String,
    pub brand: String,
    /// User-assigned category, free-form
    pub category: String,
    pub price: f64,
    pub specification: Option<String>,
    /// Purchase/observation date, "YYYY-MM-DD"
    pub date: String,
    pub remark: Option<String>,
    pub created_at: Option<String>,
}

impl ProductRecord {
    /// Builds a catalog record from a freshly parsed product.
    ///
    /// Fields the parser could not recover stay empty for the user to fill
    /// in; the date defaults to today.
    pub fn from_parsed(product: &ParsedProduct) -> Self {
        Self {
            id: None,
            url: product.source_address.clone().unwrap_or_default(),
            title: product.title.clone().unwrap_or_default(),
            brand: product.brand.clone().unwrap_or_default(),
            category: String::new(),
            price: product.price.unwrap_or(0.0),
            specification: product.specification.clone(),
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            remark: None,
            created_at: None,
        }
    }
}

/// Handle to the catalog database.
pub struct ProductStore {
    conn: Connection,
}

const SELECT_COLUMNS: &str =
    "id, url, title, brand, category, price, specification, date, remark, created_at";

impl ProductStore {
    /// Opens (and if necessary initializes) a catalog at the given path.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Opens an in-memory catalog, used by tests.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL,
                title TEXT NOT NULL,
                brand TEXT NOT NULL,
                category TEXT NOT NULL,
                price REAL NOT NULL,
                specification TEXT,
                date TEXT NOT NULL,
                remark TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;
        Ok(Self { conn })
    }

    /// Inserts a record and returns it with its id and creation timestamp.
    pub fn insert(&self, record: &ProductRecord) -> Result<ProductRecord, StoreError> {
        let mut stmt = self.conn.prepare(
            "INSERT INTO products (url, title, brand, category, price, specification, date, remark)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        let id = stmt.insert((
            &record.url,
            &record.title,
            &record.brand,
            &record.category,
            record.price,
            &record.specification,
            &record.date,
            &record.remark,
        ))?;

        self.get(id)
    }

    /// Fetches one record by id.
    pub fn get(&self, id: i64) -> Result<ProductRecord, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM products WHERE id = ?1",
            SELECT_COLUMNS
        ))?;

        stmt.query_row([id], row_to_record)
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => StoreError::not_found(id),
                other => StoreError::Database(other),
            })
    }

    /// Lists every record, newest first.
    pub fn list(&self) -> Result<Vec<ProductRecord>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM products ORDER BY created_at DESC, id DESC",
            SELECT_COLUMNS
        ))?;

        let rows = stmt.query_map([], row_to_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Updates an existing record in place.
    pub fn update(&self, record: &ProductRecord) -> Result<(), StoreError> {
        let Some(id) = record.id else {
            return Err(StoreError::not_found(-1));
        };

        let changed = self.conn.execute(
            "UPDATE products
             SET url = ?1, title = ?2, brand = ?3, category = ?4, price = ?5,
                 specification = ?6, date = ?7, remark = ?8
             WHERE id = ?9",
            (
                &record.url,
                &record.title,
                &record.brand,
                &record.category,
                record.price,
                &record.specification,
                &record.date,
                &record.remark,
                id,
            ),
        )?;

        if changed == 0 {
            return Err(StoreError::not_found(id));
        }
        Ok(())
    }

    /// Deletes a record by id.
    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(StoreError::not_found(id));
        }
        Ok(())
    }
}

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<ProductRecord> {
    Ok(ProductRecord {
        id: Some(row.get(0)?),
        url: row.get(1)?,
        title: row.get(2)?,
        brand: row.get(3)?,
        category: row.get(4)?,
        price: row.get(5)?,
        specification: row.get(6)?,
        date: row.get(7)?,
        remark: row.get(8)?,
        created_at: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ProductRecord {
        ProductRecord {
            id: None,
            url: "https://item.jd.com/123456.html".to_string(),
            title: "感冒灵颗粒".to_string(),
            brand: "三九".to_string(),
            category: "藥用".to_string(),
            price: 30.0,
            specification: Some("净含量: 120g".to_string()),
            date: "2025-06-01".to_string(),
            remark: None,
            created_at: None,
        }
    }

    mod succeeds {
        use super::*;

        #[test]
        fn test_insert_assigns_id_and_timestamp() {
            let store = ProductStore::in_memory().unwrap();
            let inserted = store.insert(&sample_record()).unwrap();

            assert!(inserted.id.is_some());
            assert!(inserted.created_at.is_some());
            assert_eq!(inserted.title, "感冒灵颗粒");
            assert_eq!(inserted.price, 30.0);
        }

        #[test]
        fn test_list_returns_inserted_records() {
            let store = ProductStore::in_memory().unwrap();
            store.insert(&sample_record()).unwrap();
            let mut second = sample_record();
            second.title = "洁银牙膏".to_string();
            store.insert(&second).unwrap();

            let records = store.list().unwrap();
            assert_eq!(records.len(), 2);
            // Newest first
            assert_eq!(records[0].title, "洁银牙膏");
        }

        #[test]
        fn test_update_changes_fields() {
            let store = ProductStore::in_memory().unwrap();
            let mut record = store.insert(&sample_record()).unwrap();

            record.price = 28.5;
            record.remark = Some("双十一价".to_string());
            store.update(&record).unwrap();

            let fetched = store.get(record.id.unwrap()).unwrap();
            assert_eq!(fetched.price, 28.5);
            assert_eq!(fetched.remark.as_deref(), Some("双十一价"));
        }

        #[test]
        fn test_delete_removes_record() {
            let store = ProductStore::in_memory().unwrap();
            let inserted = store.insert(&sample_record()).unwrap();

            store.delete(inserted.id.unwrap()).unwrap();
            assert!(store.list().unwrap().is_empty());
        }

        #[test]
        fn test_open_creates_file_backed_catalog() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("catalog.db");
            let store = ProductStore::open(path.to_str().unwrap()).unwrap();
            store.insert(&sample_record()).unwrap();

            // Reopening sees the persisted record
            drop(store);
            let reopened = ProductStore::open(path.to_str().unwrap()).unwrap();
            assert_eq!(reopened.list().unwrap().len(), 1);
        }

        #[test]
        fn test_from_parsed_fills_available_fields() {
            let parsed = ParsedProduct {
                title: Some("Product".to_string()),
                brand: Some("Brand".to_string()),
                price: Some(49.9),
                source_address: Some("https://item.jd.com/1.html".to_string()),
                ..Default::default()
            };

            let record = ProductRecord::from_parsed(&parsed);
            assert_eq!(record.title, "Product");
            assert_eq!(record.brand, "Brand");
            assert_eq!(record.price, 49.9);
            assert_eq!(record.url, "https://item.jd.com/1.html");
            assert!(record.category.is_empty());
            assert!(!record.date.is_empty());
        }
    }

    mod fails {
        use super::*;

        #[test]
        fn test_get_missing_record() {
            let store = ProductStore::in_memory().unwrap();
            let err = store.get(999).unwrap_err();
            assert!(matches!(err, StoreError::NotFound { id: 999 }));
        }

        #[test]
        fn test_update_missing_record() {
            let store = ProductStore::in_memory().unwrap();
            let mut record = sample_record();
            record.id = Some(42);
            let err = store.update(&record).unwrap_err();
            assert!(matches!(err, StoreError::NotFound { id: 42 }));
        }

        #[test]
        fn test_delete_missing_record() {
            let store = ProductStore::in_memory().unwrap();
            let err = store.delete(7).unwrap_err();
            assert!(matches!(err, StoreError::NotFound { id: 7 }));
        }
    }
}
