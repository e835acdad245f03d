//! Persistent key-value storage.
//!
//! The cart is written as a single JSON string under one well-known key,
//! mirroring browser local storage. [`FileStore`] keeps every key in one JSON
//! object on disk; [`MemoryStore`] keeps them in process.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors that can occur reading or writing the key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Backing file is not a JSON object of strings.
    #[error("Corrupt storage file {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A previous writer panicked while holding the store lock.
    #[error("Storage lock poisoned")]
    Poisoned,

    /// The blocking task running a write panicked or was cancelled.
    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Synchronous string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
