//! Metadata persistence.
//!
//! Records are key-addressed by image path: saving a batch upserts row per
//! row, so reprocessing a directory replaces stale records instead of
//! duplicating them. The record itself is stored as a JSON payload column,
//! which keeps the schema stable while the record shape evolves and makes
//! the save/load round-trip exact by construction.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::record::DetectionRecord;

pub trait MetadataStore {
    /// Persist a batch of records, replacing any existing record for the
    /// same image path.
    fn save(&mut self, records: &[DetectionRecord]) -> Result<()>;

    /// Load every record in insertion order.
    fn load(&mut self) -> Result<Vec<DetectionRecord>>;
}

pub struct SqliteMetadataStore {
    conn: Connection,
}

impl SqliteMetadataStore {
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("failed to open metadata db {}", db_path))?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;

            CREATE TABLE IF NOT EXISTS detection_records (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              image_path TEXT NOT NULL UNIQUE,
              payload_json TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }
}

impl MetadataStore for SqliteMetadataStore {
    fn save(&mut self, records: &[DetectionRecord]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for record in records {
            let payload_json = serde_json::to_string(record)?;
            tx.execute(
                r#"
                INSERT INTO detection_records(image_path, payload_json)
                VALUES (?1, ?2)
                ON CONFLICT(image_path) DO UPDATE SET payload_json = excluded.payload_json
                "#,
                params![record.image_path(), payload_json],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn load(&mut self) -> Result<Vec<DetectionRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT payload_json FROM detection_records ORDER BY id")?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let payload_json: String = row.get(0)?;
            let record: DetectionRecord = serde_json::from_str(&payload_json)
                .context("corrupt metadata db: invalid record payload")?;
            records.push(record);
        }
        Ok(records)
    }
}

/// Writes a result set as pretty-printed JSON ("download results").
///
/// Every record field round-trips verbatim; this is the interchange format
/// consumed by external viewers.
pub fn write_results_json(path: &Path, records: &[&DetectionRecord]) -> Result<()> {
    let json = serde_json::to_vec_pretty(records)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write results to {}", path.display()))?;
    Ok(())
}
