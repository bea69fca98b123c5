//! Storage port abstractions.
//!
//! This module defines the two ports every persistence path goes through:
//!
//! - [`KeyValueStore`]: the primary store. Synchronous, string-keyed, small and
//!   quota-bound (`localStorage`-like).
//! - [`ImageStore`]: the secondary store. Asynchronous, larger, holding one image
//!   payload per project id (an `IndexedDB` object store).
//!
//! Both are shared, process-wide state, so methods take `&self` and implementations
//! use interior mutability.

use crate::domain::error::Result;
use crate::storage::models::ImageBlobEntry;
use async_trait::async_trait;

/// Synchronous string key/value store with a capacity limit.
///
/// # Implementations
///
/// - [`MemoryKeyValueStore`](crate::storage::MemoryKeyValueStore): in-memory map
/// - [`JsonFileStore`](crate::storage::JsonFileStore): JSON file with atomic writes
///
/// # Examples
///
/// ```
/// use portfolio_store::storage::{KeyValueStore, MemoryKeyValueStore};
///
/// let store = MemoryKeyValueStore::default();
/// store.set_item("theme", "dark")?;
/// assert_eq!(store.get_item("theme")?.as_deref(), Some("dark"));
/// # Ok::<(), portfolio_store::PortfolioError>(())
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// The write is all-or-nothing: on error the previous value is left in place.
    ///
    /// # Errors
    ///
    /// Returns [`PortfolioError::QuotaExceeded`](crate::PortfolioError::QuotaExceeded)
    /// if the write would push the store past its capacity, or another error if the
    /// backend fails.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Lists every key currently stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Asynchronous store for image payloads, keyed by project id.
///
/// # Implementations
///
/// - [`MemoryImageStore`](crate::storage::MemoryImageStore): in-memory map
/// - [`JsonImageStore`](crate::storage::JsonImageStore): single JSON object-store file
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Creates or overwrites the entry for `entry.id`.
    ///
    /// # Errors
    ///
    /// Returns [`PortfolioError::ImageStoreUnavailable`](crate::PortfolioError::ImageStoreUnavailable)
    /// if the store cannot be used at all, or another error if the write fails.
    async fn put(&self, entry: &ImageBlobEntry) -> Result<()>;

    /// Reads the entry for `id`. Returns `Ok(None)` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable or the read fails.
    async fn get(&self, id: &str) -> Result<Option<ImageBlobEntry>>;

    /// Deletes the entry for `id`. Deleting a missing entry is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable or the delete fails.
    async fn delete(&self, id: &str) -> Result<()>;
}
