//! File-backed key-value store.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::{KeyValueStore, StorageError};

/// Key-value store persisted as a single JSON object file.
///
/// Writes go to a sibling temporary file which then replaces the original, so
/// a crash mid-write never leaves a truncated file behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open a store at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.display_path(),
            source,
        }
    }

    /// Read every entry, `None` if the file does not exist yet.
    fn read_entries(&self) -> Result<Option<BTreeMap<String, String>>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                path: self.display_path(),
                source,
            })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(entries).map_err(|source| StorageError::Corrupt {
            path: self.display_path(),
            source,
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self
            .read_entries()?
            .and_then(|mut entries| entries.remove(key)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;

        let mut entries = match self.read_entries() {
            Ok(entries) => entries.unwrap_or_default(),
            Err(StorageError::Corrupt { path, source }) => {
                warn!(%path, error = %source, "Replacing corrupt storage file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };

        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)?;

        debug!(path = %self.display_path(), key, bytes = value.len(), "Storage entry written");
        Ok(())
    }
}
