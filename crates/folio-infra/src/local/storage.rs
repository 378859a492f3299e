//! Local storage backends: a directory of JSON files, and an in-memory map.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use folio_core::ports::{LocalStorage, StorageError};

/// File-backed storage. Each key lives in `<dir>/<key>.json`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash never leaves a half-written value behind.
pub struct FileLocalStorage {
    dir: PathBuf,
}

impl FileLocalStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl LocalStorage for FileLocalStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read(format!("{}: {}", path.display(), e))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        let write_err = |e: std::io::Error| StorageError::Write(format!("{}: {}", path.display(), e));

        tokio::fs::create_dir_all(&self.dir).await.map_err(write_err)?;
        tokio::fs::write(&tmp, value).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(write_err)?;
        Ok(())
    }
}

/// In-memory storage using a HashMap with async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryLocalStorage {
    store: RwLock<HashMap<String, String>>,
}

impl InMemoryLocalStorage {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryLocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocalStorage for InMemoryLocalStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.store.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.store
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
