//! Typed access to the non-project keys of the primary store.
//!
//! Malformed values read as absent; writes go straight to the primary store and report
//! its errors (including quota errors for large background payloads).

use crate::domain::error::Result;
use crate::storage::models::{CurrentUser, GithubRepoSettings};
use crate::storage::portfolio::PortfolioStore;
use serde::de::DeserializeOwned;
use serde::Serialize;

impl PortfolioStore {
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.primary().get_item(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to read setting");
                return None;
            }
        };

        serde_json::from_str(&raw)
            .map_err(|e| tracing::warn!(key = %key, error = %e, "ignoring malformed setting"))
            .ok()
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.primary().set_item(key, &json)
    }

    /// Returns the signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<CurrentUser> {
        self.read_json(&self.keys().current_user)
    }

    /// Records `user` as signed in.
    ///
    /// # Errors
    ///
    /// Returns an error if the primary store rejects the write.
    pub fn set_current_user(&self, user: &CurrentUser) -> Result<()> {
        self.write_json(&self.keys().current_user, user)
    }

    /// Signs the current user out.
    ///
    /// # Errors
    ///
    /// Returns an error if the primary store fails.
    pub fn clear_current_user(&self) -> Result<()> {
        self.primary().remove_item(&self.keys().current_user)
    }

    /// Returns the background image (URL or inline payload), if one is set.
    #[must_use]
    pub fn background(&self) -> Option<String> {
        match self.primary().get_item(&self.keys().background) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read background");
                None
            }
        }
    }

    /// Sets the background image. Stored raw, not JSON-encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if the primary store rejects the write.
    pub fn set_background(&self, source: &str) -> Result<()> {
        self.primary().set_item(&self.keys().background, source)
    }

    /// Reverts to the default background.
    ///
    /// # Errors
    ///
    /// Returns an error if the primary store fails.
    pub fn clear_background(&self) -> Result<()> {
        self.primary().remove_item(&self.keys().background)
    }

    /// Returns the GitHub image-browser settings, if saved.
    #[must_use]
    pub fn github_settings(&self) -> Option<GithubRepoSettings> {
        self.read_json(&self.keys().github_settings)
    }

    /// Saves the GitHub image-browser settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the primary store rejects the write.
    pub fn set_github_settings(&self, settings: &GithubRepoSettings) -> Result<()> {
        self.write_json(&self.keys().github_settings, settings)
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::{
        CurrentUser, GithubRepoSettings, KeyValueStore, MemoryKeyValueStore, PortfolioStore,
    };
    use std::sync::Arc;

    #[test]
    fn current_user_round_trips_and_clears() {
        let primary = Arc::new(MemoryKeyValueStore::unbounded());
        let store = PortfolioStore::new(primary.clone());
        let user = CurrentUser {
            username: "admin".to_string(),
            is_admin: true,
        };

        store.set_current_user(&user).unwrap();
        assert_eq!(
            primary.get_item("currentUser").unwrap().as_deref(),
            Some(r#"{"username":"admin","isAdmin":true}"#)
        );
        assert_eq!(store.current_user(), Some(user));

        store.clear_current_user().unwrap();
        assert!(store.current_user().is_none());
    }

    #[test]
    fn malformed_settings_read_as_absent() {
        let primary = Arc::new(MemoryKeyValueStore::unbounded());
        primary.set_item("githubRepoSettings", "not json").unwrap();
        let store = PortfolioStore::new(primary);
        assert!(store.github_settings().is_none());

        let settings = GithubRepoSettings {
            owner: "octo".to_string(),
            repo: "assets".to_string(),
            path: "images".to_string(),
            token: String::new(),
        };
        store.set_github_settings(&settings).unwrap();
        assert_eq!(store.github_settings(), Some(settings));
    }

    #[test]
    fn background_is_stored_raw() {
        let primary = Arc::new(MemoryKeyValueStore::unbounded());
        let store = PortfolioStore::new(primary.clone());

        store.set_background("https://example.com/bg.jpg").unwrap();
        assert_eq!(
            primary.get_item("backgroundImage").unwrap().as_deref(),
            Some("https://example.com/bg.jpg")
        );
        assert_eq!(store.background().as_deref(), Some("https://example.com/bg.jpg"));

        store.clear_background().unwrap();
        assert!(store.background().is_none());
    }
}
