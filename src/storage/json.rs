//! JSON file-based storage backends.
//!
//! This module provides file-backed versions of both storage ports so that the store
//! survives restarts outside a browser. Each backend keeps its whole dataset in memory
//! and rewrites one JSON file per modification, using atomic writes (write-to-temp +
//! rename) to prevent corruption on crashes.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) - the file is loaded once on open
//! - **Write**: O(n) - serializes and writes the entire dataset
//! - **Best for**: portfolio-sized data, infrequent writes

use crate::domain::error::{PortfolioError, Result};
use crate::storage::backend::{ImageStore, KeyValueStore};
use crate::storage::memory::{check_quota, lock, usage_of};
use crate::storage::models::ImageBlobEntry;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Version of the on-disk format for future migrations.
const FORMAT_VERSION: u32 = 1;

/// Writes `value` as JSON to `path` via a temporary file and rename.
fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    let tmp_path = path.with_extension("tmp");

    tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
    std::fs::write(&tmp_path, json)?;

    tracing::trace!("renaming temporary file to final location");
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Reads and parses `path`, or returns `T::default()` if it does not exist yet.
fn read_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        tracing::debug!(path = ?path, "initializing new empty storage file");
        return Ok(T::default());
    }

    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| PortfolioError::Storage(format!("failed to parse {}: {e}", path.display())))
}

/// On-disk layout of [`JsonFileStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct KeyValueData {
    version: u32,
    #[serde(default)]
    items: BTreeMap<String, String>,
}

impl Default for KeyValueData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            items: BTreeMap::new(),
        }
    }
}

/// File-backed key/value store with an optional byte quota.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "items": {
///     "projects": "[{\"id\":\"1\",\"title\":\"...\"}]",
///     "currentUser": "{\"username\":\"admin\",\"isAdmin\":true}"
///   }
/// }
/// ```
#[derive(Debug)]
pub struct JsonFileStore {
    file_path: PathBuf,
    data: Mutex<KeyValueData>,
    quota: Option<usize>,
}

impl JsonFileStore {
    /// Opens or creates a key/value store file.
    ///
    /// Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, or the file exists but
    /// cannot be read or parsed.
    pub fn open(file_path: impl Into<PathBuf>, quota: Option<usize>) -> Result<Self> {
        let file_path = file_path.into();
        tracing::debug!(path = ?file_path, "opening JSON key/value store");

        let data: KeyValueData = read_or_default(&file_path)?;
        tracing::debug!(
            version = data.version,
            items = data.items.len(),
            used_bytes = usage_of(&data.items),
            "key/value store loaded"
        );

        Ok(Self {
            file_path,
            data: Mutex::new(data),
            quota,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Applies `change` to a copy of the items and persists it; memory is only updated
    /// once the file write succeeded.
    fn commit<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut data = lock(&self.data);
        let mut next = KeyValueData {
            version: FORMAT_VERSION,
            items: data.items.clone(),
        };
        change(&mut next.items);
        write_atomic(&self.file_path, &next)?;
        *data = next;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(lock(&self.data).items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_set_item", key = %key, len = value.len()).entered();

        check_quota(&lock(&self.data).items, key, value, self.quota)?;
        self.commit(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        if !lock(&self.data).items.contains_key(key) {
            return Ok(());
        }
        self.commit(|items| {
            items.remove(key);
        })
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(lock(&self.data).items.keys().cloned().collect())
    }
}

/// On-disk layout of [`JsonImageStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ObjectStoreData {
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, ImageBlobEntry>,
}

impl Default for ObjectStoreData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// File-backed image store: one named object store, one JSON file.
#[derive(Debug)]
pub struct JsonImageStore {
    file_path: PathBuf,
    data: Mutex<ObjectStoreData>,
}

impl JsonImageStore {
    /// Opens or creates the object store `<dir>/<store_name>.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, or the file exists but
    /// cannot be read or parsed.
    pub fn open(dir: impl AsRef<Path>, store_name: &str) -> Result<Self> {
        if store_name.is_empty() || store_name.contains(['/', '\\']) {
            return Err(PortfolioError::Config(format!(
                "invalid image store name: {store_name:?}"
            )));
        }

        let file_path = dir.as_ref().join(format!("{store_name}.json"));
        tracing::debug!(path = ?file_path, "opening JSON image store");

        let data: ObjectStoreData = read_or_default(&file_path)?;
        tracing::debug!(entries = data.entries.len(), "image store loaded");

        Ok(Self {
            file_path,
            data: Mutex::new(data),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn commit<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, ImageBlobEntry>),
    {
        let mut data = lock(&self.data);
        let mut next = ObjectStoreData {
            version: FORMAT_VERSION,
            entries: data.entries.clone(),
        };
        change(&mut next.entries);
        write_atomic(&self.file_path, &next)?;
        *data = next;
        Ok(())
    }
}

#[async_trait]
impl ImageStore for JsonImageStore {
    async fn put(&self, entry: &ImageBlobEntry) -> Result<()> {
        tracing::debug!(id = %entry.id, len = entry.image_data.len(), "storing image entry");
        self.commit(|entries| {
            entries.insert(entry.id.clone(), entry.clone());
        })
    }

    async fn get(&self, id: &str) -> Result<Option<ImageBlobEntry>> {
        Ok(lock(&self.data).entries.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        if !lock(&self.data).entries.contains_key(id) {
            return Ok(());
        }
        self.commit(|entries| {
            entries.remove(id);
        })
    }
}
