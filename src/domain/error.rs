//! Error types for the portfolio store.
//!
//! This module defines the centralized error type [`PortfolioError`] and a type alias
//! [`Result`] used throughout the crate. Only a failure of every persistence tier is
//! ever surfaced to callers of the save path; the other variants are mostly consumed
//! internally by the fallback cascade and logged.

use thiserror::Error;

/// The main error type for portfolio store operations.
///
/// # Examples
///
/// ```
/// use portfolio_store::PortfolioError;
///
/// let err = PortfolioError::QuotaExceeded {
///     key: "projects".to_string(),
///     needed: 6_000_000,
///     quota: 5_242_880,
/// };
/// assert!(err.is_quota_exceeded());
/// ```
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// A storage backend rejected or failed an operation.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The primary store refused a write because it would exceed its quota.
    ///
    /// `needed` is the total size the store would have reached, `quota` the limit.
    #[error("Storage quota exceeded writing '{key}': {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    /// The image store is not supported or has been blocked.
    #[error("Image store unavailable: {0}")]
    ImageStoreUnavailable(String),

    /// An image payload could not be decoded or re-encoded.
    #[error("Image error: {0}")]
    Image(String),

    /// JSON (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Every persistence tier failed; nothing usable was written.
    #[error("Failed to save project data: {0}")]
    SaveFailed(String),
}

impl PortfolioError {
    /// Returns `true` for capacity errors, which trigger the reduced persistence tiers.
    #[must_use]
    pub const fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

/// A specialized `Result` type for portfolio store operations.
pub type Result<T> = std::result::Result<T, PortfolioError>;
