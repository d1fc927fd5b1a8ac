//! SQLite key-value store for learner progress
//!
//! Manages the `~/.learnquest/progress.db` database with automatic schema
//! migration.

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use super::{KeyValueStore, StorageError};

/// Progress blobs stored in SQLite, one row per key
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create the store at a specific path
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL keeps readers (e.g. a second CLI invocation) off the writer's back
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        self.run_migrations()
    }

    /// Run any pending migrations
    fn run_migrations(&self) -> Result<(), StorageError> {
        let version: i32 = self
            .conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
            .unwrap_or(0);

        // Migration 2: track when each blob was last written
        if version < 2 {
            let has_updated_at: bool = self
                .conn
                .prepare("SELECT COUNT(*) FROM pragma_table_info('progress_blobs') WHERE name = 'updated_at'")
                .and_then(|mut s| s.query_row([], |r| r.get::<_, i32>(0)))
                .map(|c| c > 0)
                .unwrap_or(false);

            if !has_updated_at {
                self.conn.execute_batch(
                    "ALTER TABLE progress_blobs ADD COLUMN updated_at INTEGER NOT NULL DEFAULT 0;",
                )?;
            }
            self.conn
                .execute("INSERT OR REPLACE INTO schema_version VALUES (2)", [])?;
        }

        Ok(())
    }

    /// Keys currently stored, sorted
    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT key FROM progress_blobs ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    /// Delete the blob under `key`. Returns false if there was none.
    pub fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let deleted = self
            .conn
            .execute("DELETE FROM progress_blobs WHERE key = ?1", [key])?;
        Ok(deleted > 0)
    }
}

impl KeyValueStore for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM progress_blobs WHERE key = ?1",
                [key],
                |r| r.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StorageError> {
        self.conn.execute(
            r#"INSERT INTO progress_blobs (key, value, updated_at) VALUES (?1, ?2, ?3)
               ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3"#,
            rusqlite::params![key, blob, Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }
}

/// SQL schema for the progress database
const SCHEMA_SQL: &str = r#"
-- One serialized learner state per key
CREATE TABLE IF NOT EXISTS progress_blobs (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (1);
"#;
