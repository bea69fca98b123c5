//! Infrastructure layer for filesystem and environment interactions.

pub mod paths;

pub use paths::{default_data_dir, expand_tilde, resolve_data_dir, KEY_VALUE_FILE, LOG_FILE};
