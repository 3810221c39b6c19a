//! SQLite-backed upload ledger
//!
//! Each request persists the uploaded file and its query before the pipeline
//! runs. Records are append-only from this service's perspective.

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::types::UploadRecord;

/// Upload ledger: file bytes on disk, metadata in SQLite
pub struct UploadStore {
    conn: Arc<Mutex<Connection>>,
    upload_dir: PathBuf,
}

impl UploadStore {
    /// Create or open the store described by the configuration
    pub fn open(config: &StorageConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.upload_dir)?;
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&config.database_path)
            .map_err(|e| Error::Storage(format!("Failed to open database: {}", e)))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            upload_dir: config.upload_dir.clone(),
        };

        store.migrate()?;
        Ok(store)
    }

    /// In-memory database with a temp upload directory (for testing)
    #[cfg(test)]
    pub fn in_memory(upload_dir: &Path) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Storage(format!("Failed to open in-memory database: {}", e)))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            upload_dir: upload_dir.to_path_buf(),
        };

        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;

            CREATE TABLE IF NOT EXISTS uploads (
                id           TEXT PRIMARY KEY,
                filename     TEXT NOT NULL,
                stored_path  TEXT NOT NULL,
                query        TEXT NOT NULL,
                size_bytes   INTEGER NOT NULL,
                content_hash TEXT NOT NULL,
                created_at   TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_uploads_created_at ON uploads(created_at);
            "#,
        )
        .map_err(|e| Error::Storage(format!("Failed to run migrations: {}", e)))?;

        Ok(())
    }

    /// Persist an upload: write bytes to disk, then record the row.
    /// The returned record carries the assigned id.
    pub fn store(&self, filename: &str, query: &str, data: &[u8]) -> Result<UploadRecord> {
        let id = Uuid::new_v4();

        let stored_path = self.upload_dir.join(format!("{}_{}", id, sanitize(filename)));
        std::fs::write(&stored_path, data)?;

        let record = UploadRecord {
            id,
            filename: filename.to_string(),
            stored_path: stored_path.to_string_lossy().to_string(),
            query: query.to_string(),
            size_bytes: data.len() as u64,
            content_hash: hash_bytes(data),
            created_at: Utc::now(),
        };

        let conn = self.conn.lock();
        conn.execute(
            r#"
            INSERT INTO uploads (id, filename, stored_path, query, size_bytes, content_hash, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                record.id.to_string(),
                record.filename,
                record.stored_path,
                record.query,
                record.size_bytes,
                record.content_hash,
                record.created_at.to_rfc3339(),
            ],
        )?;

        Ok(record)
    }

    /// Fetch a record by id
    pub fn get(&self, id: &Uuid) -> Result<Option<UploadRecord>> {
        let conn = self.conn.lock();
        let record = conn
            .query_row(
                r#"
                SELECT id, filename, stored_path, query, size_bytes, content_hash, created_at
                FROM uploads WHERE id = ?1
                "#,
                params![id.to_string()],
                row_to_record,
            )
            .optional()?;

        Ok(record)
    }

    /// Number of persisted uploads
    pub fn count(&self) -> Result<u64> {
        let conn = self.conn.lock();
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM uploads", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<UploadRecord> {
    let id: String = row.get(0)?;
    let created_at: String = row.get(6)?;

    Ok(UploadRecord {
        id: Uuid::parse_str(&id).unwrap_or_default(),
        filename: row.get(1)?,
        stored_path: row.get(2)?,
        query: row.get(3)?,
        size_bytes: row.get(4)?,
        content_hash: row.get(5)?,
        created_at: chrono::DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

/// Keep stored filenames to a safe character set
fn sanitize(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::in_memory(dir.path()).unwrap();

        let record = store
            .store("document.pdf", "invoice total", b"%PDF-1.4 fake")
            .unwrap();

        assert_eq!(record.filename, "document.pdf");
        assert_eq!(record.query, "invoice total");
        assert_eq!(record.size_bytes, 13);
        assert!(Path::new(&record.stored_path).exists());

        let fetched = store.get(&record.id).unwrap().unwrap();
        assert_eq!(fetched.query, "invoice total");
        assert_eq!(fetched.content_hash, record.content_hash);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_get_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::in_memory(dir.path()).unwrap();
        assert!(store.get(&Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_sanitize_filenames() {
        assert_eq!(sanitize("a b/c.pdf"), "a_b_c.pdf");
        assert_eq!(sanitize("report-v2_final.pdf"), "report-v2_final.pdf");
    }
}
