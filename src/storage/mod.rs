//! Storage layer for persistent portfolio data.
//!
//! This module owns everything that touches storage: the two storage ports, their
//! in-memory and file-backed adapters, the persisted record shapes, and
//! [`PortfolioStore`], which runs the tiered save/load cascade on top of them.
//!
//! # Modules
//!
//! - `backend`: [`KeyValueStore`] and [`ImageStore`] port traits
//! - `memory`: in-memory adapters with quota and availability simulation
//! - `json`: JSON file adapters with atomic writes
//! - `models`: light records, essential records, image entries and settings
//! - `portfolio`: save/load/housekeeping over both ports
//! - `settings`: typed accessors for the user, background and GitHub keys

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;
pub mod portfolio;
mod settings;

pub use backend::{ImageStore, KeyValueStore};
pub use json::{JsonFileStore, JsonImageStore};
pub use memory::{MemoryImageStore, MemoryKeyValueStore, DEFAULT_QUOTA_BYTES};
pub use models::{
    CurrentUser, EssentialProject, GithubRepoSettings, ImageBlobEntry, StoredImage, StoredProject,
};
pub use portfolio::{PortfolioStore, SaveReport, SaveTier, StorageKeys, DEFAULT_INLINE_CEILING};
