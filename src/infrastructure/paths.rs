//! Path helpers for locating the on-disk stores.
//!
//! Data lives under `~/.local/share/portfolio-store` unless [`Config::data_dir`]
//! points somewhere else. Tilde paths are expanded against `$HOME`.
//!
//! [`Config::data_dir`]: crate::Config::data_dir

use crate::Config;
use std::path::PathBuf;

/// File name of the primary key/value store inside the data directory.
pub const KEY_VALUE_FILE: &str = "local-storage.json";

/// File name of the rotating log inside the data directory.
pub const LOG_FILE: &str = "portfolio-store.log";

/// Returns the default data directory, `~/.local/share/portfolio-store`.
///
/// Falls back to a relative `.portfolio-store` directory when `$HOME` is unset.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from(".portfolio-store"),
        |home| {
            PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("portfolio-store")
        },
    )
}

/// Returns the data directory for `config`: its `data_dir` with `~` expanded, or
/// [`default_data_dir`].
#[must_use]
pub fn resolve_data_dir(config: &Config) -> PathBuf {
    config
        .data_dir
        .as_deref()
        .map_or_else(default_data_dir, |dir| PathBuf::from(expand_tilde(dir)))
}

/// Expands a leading `~` to `$HOME`.
///
/// Paths without a leading tilde, and every path when `$HOME` is unset, come back
/// unchanged.
///
/// ```
/// use portfolio_store::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// assert_eq!(expand_tilde("relative/~/path"), "relative/~/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = std::env::var_os("HOME") else {
        return path.to_string();
    };
    let home = home.to_string_lossy();

    if path == "~" {
        home.into_owned()
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{rest}", home.trim_end_matches('/'))
    } else {
        path.to_string()
    }
}
