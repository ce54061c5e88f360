use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::PersistenceError;
use crate::sink::BatchSink;

#[derive(Debug, Clone)]
pub struct StoredRow {
    pub id: i64,
    pub batch_no: i64,
    pub row_json: String,
    pub imported_at: String,
}

/// SQLite-backed batch sink. Every row is stored as JSON.
///
/// Clones share one connection, so a caller can keep a handle for queries
/// while the listener owns another.
#[derive(Clone)]
pub struct SqliteSink {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSink {
    /// Open (or create) the database file and its parent directories, and make
    /// sure the table exists
    pub fn open(database_path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .context(format!("Failed to create directory {}", parent.display()))?;
            }
        }
        let conn = Connection::open(database_path)
            .context(format!("Failed to open database at {}", database_path))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS imported_rows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                batch_no INTEGER NOT NULL,
                row_json TEXT NOT NULL,
                imported_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create imported_rows table")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Database connection lock poisoned"))
    }

    /// Insert one batch in a single transaction. Returns the batch number,
    /// or `None` for an empty batch.
    pub fn insert_batch<R: Serialize>(&self, rows: &[R]) -> Result<Option<i64>> {
        if rows.is_empty() {
            return Ok(None);
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction().context("Failed to begin transaction")?;
        let imported_at = Utc::now().to_rfc3339();

        let batch_no: i64 = tx.query_row(
            "SELECT COALESCE(MAX(batch_no), 0) + 1 FROM imported_rows",
            [],
            |row| row.get(0),
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO imported_rows (batch_no, row_json, imported_at) VALUES (?1, ?2, ?3)",
            )?;
            for row in rows {
                let json = serde_json::to_string(row).context("Failed to serialize row")?;
                stmt.execute(params![batch_no, json, imported_at])
                    .context("Failed to insert row")?;
            }
        }

        tx.commit().context("Failed to commit batch")?;
        Ok(Some(batch_no))
    }

    pub fn row_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM imported_rows", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn batch_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(DISTINCT batch_no) FROM imported_rows",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// All stored rows in insertion order
    pub fn list_rows(&self) -> Result<Vec<StoredRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, batch_no, row_json, imported_at FROM imported_rows ORDER BY id ASC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(StoredRow {
                    id: row.get(0)?,
                    batch_no: row.get(1)?,
                    row_json: row.get(2)?,
                    imported_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

impl<R: Serialize> BatchSink<R> for SqliteSink {
    fn save_batch(&mut self, rows: Vec<R>) -> Result<(), PersistenceError> {
        self.insert_batch(&rows)
            .map(|_| ())
            .map_err(|e| PersistenceError::new(rows.len(), format!("{:#}", e)))
    }
}
