//! Portfolio Store: tiered persistence for a portfolio showcase.
//!
//! A portfolio site keeps its project list in a small, quota-bound key/value store
//! (the browser's local storage) and its heavyweight project images in a larger
//! object store. This crate is that storage core:
//! - Downscaling and JPEG re-encoding of inline image payloads
//! - A tiered save that moves images out of the primary store and falls back to an
//!   essential-fields list when space runs out
//! - Loading that rehydrates images; a record whose image cannot be resolved loads
//!   without one
//! - A housekeeping sweep that frees space without touching the core keys
//! - An editor session that coalesces overlapping saves and reports failures as
//!   notifications
#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - PortfolioEditor: canonical list, save guard      │
//! │  - Search and tag filtering                         │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Storage Layer (storage/)                           │
//! │  - PortfolioStore: save / load / sweep              │
//! │  - KeyValueStore + ImageStore ports                 │
//! │  - Memory and JSON file adapters                    │
//! └─────────────────────────────────────────────────────┘
//!         │                                    │
//! ┌───────────────┐                   ┌───────────────────┐
//! │ Media (media/)│                   │ Domain (domain/)  │
//! │ - Data URIs   │                   │ - Project model   │
//! │ - Compressor  │                   │ - Error types     │
//! └───────────────┘                   └───────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Observability                     │
//! │  - Data directory resolution                        │
//! │  - Rotating log file                                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: editor session and search
//! - [`domain`]: project model and errors
//! - [`media`]: data URI handling and image compression
//! - [`storage`]: ports, adapters and the tiered store
//! - [`seed`]: default projects
//! - [`infrastructure`]: data directory paths
//! - [`observability`]: tracing subscriber with a rotating log file
//!
//! # Configuration
//!
//! ```toml
//! # portfolio-store.toml
//! data_dir = "~/.local/share/portfolio-store"
//! inline_ceiling = 51200
//! max_image_width = 500
//! max_image_height = 350
//! image_quality = 70
//! trace_level = "debug"
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use portfolio_store::storage::{MemoryImageStore, MemoryKeyValueStore, PortfolioStore};
//! use portfolio_store::seed::default_projects;
//!
//! # tokio_test_runtime(async {
//! let store = PortfolioStore::new(Arc::new(MemoryKeyValueStore::default()))
//!     .with_image_store(Arc::new(MemoryImageStore::default()));
//!
//! store.save_projects(&default_projects()).await?;
//! let loaded = store.load_projects(default_projects()).await;
//! assert_eq!(loaded.len(), 6);
//! # Ok::<(), portfolio_store::PortfolioError>(())
//! # }).unwrap();
//! # fn tokio_test_runtime<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod media;
pub mod observability;
pub mod seed;
pub mod storage;

pub use app::{FlushOutcome, Notification, NotificationLevel, PortfolioEditor};
pub use domain::{PortfolioError, Project, ProjectImage, Result};
pub use storage::{PortfolioStore, SaveReport, SaveTier};

use crate::media::compressor::{DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY};
use crate::storage::{
    ImageStore, JsonFileStore, JsonImageStore, StorageKeys, DEFAULT_INLINE_CEILING,
    DEFAULT_QUOTA_BYTES,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Default name of the image object store.
pub const DEFAULT_IMAGE_STORE_NAME: &str = "projectImages";

/// Store configuration.
///
/// Every field has a default matching the browser deployment, so a partial map or
/// TOML file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Primary key holding the light project list. Default: `"projects"`
    pub projects_key: String,

    /// Primary key holding the signed-in user. Default: `"currentUser"`
    pub user_key: String,

    /// Primary key holding the background image. Default: `"backgroundImage"`
    pub background_key: String,

    /// Primary key holding the GitHub image-browser settings.
    /// Default: `"githubRepoSettings"`
    pub github_settings_key: String,

    /// Name of the image object store. Default: `"projectImages"`
    pub image_store_name: String,

    /// Bounding box width for compressed images. Default: 500
    pub max_image_width: u32,

    /// Bounding box height for compressed images. Default: 350
    pub max_image_height: u32,

    /// JPEG quality (1-100) for compressed images. Default: 70
    pub image_quality: u8,

    /// Largest compressed image, in bytes, that may stay inline in a light record.
    /// Default: 51200
    pub inline_ceiling: usize,

    /// Byte quota of the primary store; `None` is unbounded. Default: 5 MiB
    pub primary_quota: Option<usize>,

    /// Directory for the store files and the log. `~` is expanded.
    /// Default: `~/.local/share/portfolio-store`
    pub data_dir: Option<String>,

    /// Tracing filter directive. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let keys = StorageKeys::default();
        Self {
            projects_key: keys.projects,
            user_key: keys.current_user,
            background_key: keys.background,
            github_settings_key: keys.github_settings,
            image_store_name: DEFAULT_IMAGE_STORE_NAME.to_string(),
            max_image_width: DEFAULT_MAX_WIDTH,
            max_image_height: DEFAULT_MAX_HEIGHT,
            image_quality: DEFAULT_QUALITY,
            inline_ceiling: DEFAULT_INLINE_CEILING,
            primary_quota: Some(DEFAULT_QUOTA_BYTES),
            data_dir: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from a flat string map.
    ///
    /// # Parsing Rules
    ///
    /// - String fields are taken as-is; empty values keep the default
    /// - Numeric fields fall back to the default when they do not parse
    /// - `primary_quota` of `0` means unbounded
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use portfolio_store::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("inline_ceiling".to_string(), "20480".to_string());
    /// map.insert("image_quality".to_string(), "not a number".to_string());
    /// map.insert("primary_quota".to_string(), "0".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.inline_ceiling, 20480);
    /// assert_eq!(config.image_quality, 70);
    /// assert_eq!(config.primary_quota, None);
    /// assert_eq!(config.projects_key, "projects");
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let text = |key: &str, default: String| {
            config
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map_or(default, String::from)
        };
        let optional = |key: &str| {
            config
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        let primary_quota = match config.get("primary_quota").map(|s| s.trim().parse::<usize>()) {
            Some(Ok(0)) => None,
            Some(Ok(quota)) => Some(quota),
            Some(Err(_)) | None => defaults.primary_quota,
        };

        Self {
            projects_key: text("projects_key", defaults.projects_key),
            user_key: text("user_key", defaults.user_key),
            background_key: text("background_key", defaults.background_key),
            github_settings_key: text("github_settings_key", defaults.github_settings_key),
            image_store_name: text("image_store_name", defaults.image_store_name),
            max_image_width: parse_or(config, "max_image_width", defaults.max_image_width),
            max_image_height: parse_or(config, "max_image_height", defaults.max_image_height),
            image_quality: parse_or(config, "image_quality", defaults.image_quality),
            inline_ceiling: parse_or(config, "inline_ceiling", defaults.inline_ceiling),
            primary_quota,
            data_dir: optional("data_dir").or(defaults.data_dir),
            trace_level: optional("trace_level").or(defaults.trace_level),
        }
    }

    /// Loads configuration from a TOML file. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PortfolioError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PortfolioError::Config(format!("Failed to read config file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| PortfolioError::Config(format!("Failed to parse config TOML: {e}")))
    }

    /// The primary-store keys named by this configuration.
    #[must_use]
    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys {
            projects: self.projects_key.clone(),
            current_user: self.user_key.clone(),
            background: self.background_key.clone(),
            github_settings: self.github_settings_key.clone(),
        }
    }
}

fn parse_or<T: std::str::FromStr>(config: &BTreeMap<String, String>, key: &str, default: T) -> T {
    config
        .get(key)
        .and_then(|s| s.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Opens a [`PortfolioStore`] backed by JSON files in the configured data directory.
///
/// The primary store is `<data_dir>/local-storage.json` with the configured quota;
/// images go to `<data_dir>/<image_store_name>.json`.
///
/// # Errors
///
/// Returns an error if either file exists but cannot be read or parsed, the data
/// directory cannot be created, or the image store name is invalid.
pub fn open_file_backed(config: &Config) -> Result<PortfolioStore> {
    let data_dir = infrastructure::resolve_data_dir(config);
    let _span = tracing::debug_span!("open_file_backed", data_dir = ?data_dir).entered();

    let primary = JsonFileStore::open(
        data_dir.join(infrastructure::KEY_VALUE_FILE),
        config.primary_quota,
    )?;
    let images: Arc<dyn ImageStore> =
        Arc::new(JsonImageStore::open(&data_dir, &config.image_store_name)?);

    tracing::debug!("file-backed store ready");
    Ok(PortfolioStore::from_config(Arc::new(primary), Some(images), config))
}
