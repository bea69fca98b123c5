//! In-memory storage backends.
//!
//! [`MemoryKeyValueStore`] mirrors the semantics of browser `localStorage`, including a
//! byte quota, and [`MemoryImageStore`] stands in for the `IndexedDB` image store. Both
//! are used as the default adapters in tests and embedding scenarios where nothing
//! needs to survive the process.

use crate::domain::error::{PortfolioError, Result};
use crate::storage::backend::{ImageStore, KeyValueStore};
use crate::storage::models::ImageBlobEntry;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default primary-store quota (5 MiB), matching common browser limits.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Byte usage of a set of items: every key plus every value.
pub(crate) fn usage_of(items: &BTreeMap<String, String>) -> usize {
    items.iter().map(|(k, v)| k.len() + v.len()).sum()
}

/// Checks that writing `value` under `key` keeps `items` within `quota`.
///
/// Returns the projected usage on success.
pub(crate) fn check_quota(
    items: &BTreeMap<String, String>,
    key: &str,
    value: &str,
    quota: Option<usize>,
) -> Result<usize> {
    let current = usage_of(items);
    let replaced = items.get(key).map_or(0, |old| key.len() + old.len());
    let needed = current - replaced + key.len() + value.len();

    match quota {
        Some(quota) if needed > quota => Err(PortfolioError::QuotaExceeded {
            key: key.to_string(),
            needed,
            quota,
        }),
        _ => Ok(needed),
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory key/value store with an optional byte quota.
#[derive(Debug)]
pub struct MemoryKeyValueStore {
    items: Mutex<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl Default for MemoryKeyValueStore {
    fn default() -> Self {
        Self::with_quota(DEFAULT_QUOTA_BYTES)
    }
}

impl MemoryKeyValueStore {
    /// Creates a store that rejects writes beyond `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: Mutex::new(BTreeMap::new()),
            quota: Some(quota),
        }
    }

    /// Creates a store with no capacity limit.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            items: Mutex::new(BTreeMap::new()),
            quota: None,
        }
    }

    #[must_use]
    pub const fn quota(&self) -> Option<usize> {
        self.quota
    }

    /// Bytes currently used (keys plus values).
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        usage_of(&lock(&self.items))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(lock(&self.items).get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = lock(&self.items);
        let needed = check_quota(&items, key, value, self.quota)?;
        items.insert(key.to_string(), value.to_string());
        tracing::trace!(key = %key, used_bytes = needed, "memory store item set");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        lock(&self.items).remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(lock(&self.items).keys().cloned().collect())
    }
}

/// In-memory image store with an availability switch.
///
/// While unavailable every operation fails with
/// [`PortfolioError::ImageStoreUnavailable`], the way a blocked `IndexedDB` does in a
/// restrictive browser mode.
#[derive(Debug)]
pub struct MemoryImageStore {
    entries: Mutex<HashMap<String, ImageBlobEntry>>,
    available: AtomicBool,
}

impl Default for MemoryImageStore {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl MemoryImageStore {
    /// Creates a store that starts out unavailable.
    #[must_use]
    pub fn unavailable() -> Self {
        let store = Self::default();
        store.set_available(false);
        store
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        lock(&self.entries).contains_key(id)
    }

    fn ensure_available(&self) -> Result<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(PortfolioError::ImageStoreUnavailable(
                "in-memory image store disabled".to_string(),
            ))
        }
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn put(&self, entry: &ImageBlobEntry) -> Result<()> {
        self.ensure_available()?;
        lock(&self.entries).insert(entry.id.clone(), entry.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<ImageBlobEntry>> {
        self.ensure_available()?;
        Ok(lock(&self.entries).get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.ensure_available()?;
        lock(&self.entries).remove(id);
        Ok(())
    }
}
