//! Persistence adapters
//!
//! The engine sees storage as an opaque blob per key. Two adapters ship with
//! the crate: [`MemoryStore`] for tests and embedding, and [`SqliteStore`]
//! backed by `~/.learnquest/progress.db`.

mod db;
mod memory;

pub use db::SqliteStore;
pub use memory::MemoryStore;

/// Error type for storage adapters
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to prepare storage directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Key-value persistence for serialized learner state
pub trait KeyValueStore {
    /// Read the blob stored under `key`, if any
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `blob` under `key`, replacing any previous value
    fn save(&mut self, key: &str, blob: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StorageError> {
        (**self).save(key, blob)
    }
}
