//! Tiered project persistence.
//!
//! [`PortfolioStore`] turns the in-memory project list into durable storage and back,
//! hiding where each image physically lives: in the image store, inline as a
//! compressed payload, or nowhere.
//!
//! # Save cascade
//!
//! ```text
//! per record (concurrently):
//!   inline image ──put──▶ image store ──ok──▶ flag External
//!                              │ err
//!                              ▼
//!                 compress ── fits ceiling? ──yes──▶ keep compressed inline
//!                                   │ no
//!                                   ▼
//!                              drop image
//!
//! whole list:
//!   light list ──quota──▶ sweep + retry ──quota──▶ essential subset ──fail──▶ SaveFailed
//! ```
//!
//! Loading reverses this: light records are parsed and every record that does not
//! carry an inline payload is looked up in the image store concurrently. A record
//! with an entry there gets that payload back; one without keeps what it had.
//! Reads never fail; they degrade to the caller's seed list.

use crate::domain::error::{PortfolioError, Result};
use crate::domain::{Project, ProjectImage};
use crate::media::{data_uri, ImageCompressor};
use crate::storage::backend::{ImageStore, KeyValueStore};
use crate::storage::models::{EssentialProject, ImageBlobEntry, StoredImage, StoredProject};
use crate::Config;
use futures_util::future::join_all;
use std::sync::Arc;

/// Default ceiling for an inline payload kept in the primary store (50 KiB of text).
pub const DEFAULT_INLINE_CEILING: usize = 50 * 1024;

/// Primary-store keys owned by the portfolio store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// The light project list.
    pub projects: String,
    /// The signed-in user.
    pub current_user: String,
    /// The site background image.
    pub background: String,
    /// GitHub image-browser settings.
    pub github_settings: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            projects: "projects".to_string(),
            current_user: "currentUser".to_string(),
            background: "backgroundImage".to_string(),
            github_settings: "githubRepoSettings".to_string(),
        }
    }
}

impl StorageKeys {
    /// Keys the housekeeping sweep never removes.
    #[must_use]
    pub fn allow_list(&self) -> [&str; 3] {
        [&self.projects, &self.current_user, &self.background]
    }
}

/// Which persistence tier ended up holding the project list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveTier {
    /// Every field of every light record was written.
    #[default]
    Full,
    /// Only id, title, description, tags and category were written.
    Essential,
}

/// Summary of one [`PortfolioStore::save_projects`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub tier: SaveTier,
    /// Records written.
    pub records: usize,
    /// Inline images moved into the image store.
    pub externalized: usize,
    /// Inline images kept in the primary store after the image store refused them.
    pub inlined: usize,
    /// Of `inlined`, payloads kept as given because they could not be decoded.
    pub passed_through: usize,
    /// Inline images that fit nowhere and were dropped.
    pub dropped: usize,
}

/// What happened to one record's image during a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageOutcome {
    Untouched,
    Externalized,
    Inlined,
    PassedThrough,
    Dropped,
}

/// Owner of every read and write to the portfolio's storage keys.
///
/// # Examples
///
/// ```
/// use portfolio_store::domain::Project;
/// use portfolio_store::storage::{MemoryImageStore, MemoryKeyValueStore, PortfolioStore};
/// use std::sync::Arc;
///
/// # tokio_test_block_on(async {
/// let store = PortfolioStore::new(Arc::new(MemoryKeyValueStore::default()))
///     .with_image_store(Arc::new(MemoryImageStore::default()));
///
/// store.save_projects(&[Project::new("1", "Atlas")]).await?;
/// let projects = store.load_projects(Vec::new()).await;
/// assert_eq!(projects[0].title, "Atlas");
/// # Ok::<(), portfolio_store::PortfolioError>(())
/// # }).unwrap();
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub struct PortfolioStore {
    primary: Arc<dyn KeyValueStore>,
    images: Option<Arc<dyn ImageStore>>,
    compressor: ImageCompressor,
    keys: StorageKeys,
    inline_ceiling: usize,
}

impl std::fmt::Debug for PortfolioStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioStore")
            .field("has_image_store", &self.images.is_some())
            .field("compressor", &self.compressor)
            .field("keys", &self.keys)
            .field("inline_ceiling", &self.inline_ceiling)
            .finish_non_exhaustive()
    }
}

impl PortfolioStore {
    /// Creates a store over `primary` with default keys and limits and no image store.
    ///
    /// Without an image store every inline image takes the compress-or-drop path.
    #[must_use]
    pub fn new(primary: Arc<dyn KeyValueStore>) -> Self {
        Self {
            primary,
            images: None,
            compressor: ImageCompressor::default(),
            keys: StorageKeys::default(),
            inline_ceiling: DEFAULT_INLINE_CEILING,
        }
    }

    /// Creates a store with keys, compression and ceiling taken from `config`.
    #[must_use]
    pub fn from_config(
        primary: Arc<dyn KeyValueStore>,
        images: Option<Arc<dyn ImageStore>>,
        config: &Config,
    ) -> Self {
        Self {
            primary,
            images,
            compressor: ImageCompressor::new(
                config.max_image_width,
                config.max_image_height,
                config.image_quality,
            ),
            keys: config.storage_keys(),
            inline_ceiling: config.inline_ceiling,
        }
    }

    #[must_use]
    pub fn with_image_store(mut self, images: Arc<dyn ImageStore>) -> Self {
        self.images = Some(images);
        self
    }

    #[must_use]
    pub const fn with_compressor(mut self, compressor: ImageCompressor) -> Self {
        self.compressor = compressor;
        self
    }

    #[must_use]
    pub fn with_keys(mut self, keys: StorageKeys) -> Self {
        self.keys = keys;
        self
    }

    #[must_use]
    pub const fn with_inline_ceiling(mut self, inline_ceiling: usize) -> Self {
        self.inline_ceiling = inline_ceiling;
        self
    }

    #[must_use]
    pub const fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    #[must_use]
    pub const fn inline_ceiling(&self) -> usize {
        self.inline_ceiling
    }

    pub(crate) fn primary(&self) -> &dyn KeyValueStore {
        self.primary.as_ref()
    }

    /// Persists the full project list.
    ///
    /// Every inline image is first offered to the image store; records whose image
    /// could not be stored there keep a compressed copy inline if it fits the ceiling,
    /// otherwise lose the image. Per-record image failures never fail the save.
    ///
    /// # Errors
    ///
    /// Returns [`PortfolioError::SaveFailed`] if even the essential subset does not fit
    /// in the primary store, or the primary store's own error if it fails for a reason
    /// other than capacity.
    #[tracing::instrument(level = "debug", skip_all, fields(count = projects.len()))]
    pub async fn save_projects(&self, projects: &[Project]) -> Result<SaveReport> {
        let prepared = join_all(projects.iter().map(|project| self.prepare_record(project))).await;

        let mut report = SaveReport {
            records: prepared.len(),
            ..SaveReport::default()
        };
        let mut light = Vec::with_capacity(prepared.len());
        for (record, outcome) in prepared {
            match outcome {
                ImageOutcome::Untouched => {}
                ImageOutcome::Externalized => report.externalized += 1,
                ImageOutcome::Inlined => report.inlined += 1,
                ImageOutcome::PassedThrough => {
                    report.inlined += 1;
                    report.passed_through += 1;
                }
                ImageOutcome::Dropped => report.dropped += 1,
            }
            light.push(record);
        }

        let json = serde_json::to_string(&light)?;
        if self.write_project_list(&json)? {
            tracing::debug!(?report, "project list saved");
            return Ok(report);
        }

        if self.sweep_keys() > 0 && self.write_project_list(&json)? {
            tracing::debug!(?report, "project list saved after housekeeping");
            return Ok(report);
        }

        tracing::warn!(
            count = projects.len(),
            "project list exceeds storage quota, saving essential fields only"
        );

        let essential: Vec<EssentialProject> = projects.iter().map(EssentialProject::from).collect();
        let json = serde_json::to_string(&essential)?;
        self.primary
            .set_item(&self.keys.projects, &json)
            .map_err(|e| {
                tracing::error!(error = %e, "essential project list could not be saved");
                PortfolioError::SaveFailed(e.to_string())
            })?;

        report.tier = SaveTier::Essential;
        tracing::debug!(?report, "essential project list saved");
        Ok(report)
    }

    /// Writes the serialized list. `Ok(false)` means the quota was exceeded.
    fn write_project_list(&self, json: &str) -> Result<bool> {
        match self.primary.set_item(&self.keys.projects, json) {
            Ok(()) => Ok(true),
            Err(e) if e.is_quota_exceeded() => {
                tracing::warn!(error = %e, len = json.len(), "project list write rejected");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Builds the light record for one project, relocating its image if needed.
    async fn prepare_record(&self, project: &Project) -> (StoredProject, ImageOutcome) {
        let (image, outcome) = match &project.image {
            ProjectImage::None => (StoredImage::None, ImageOutcome::Untouched),
            ProjectImage::Url(url) => (StoredImage::Source(url.clone()), ImageOutcome::Untouched),
            ProjectImage::Inline(payload) => self.place_inline_image(&project.id, payload).await,
        };
        (StoredProject::from_project(project, image), outcome)
    }

    async fn place_inline_image(&self, id: &str, payload: &str) -> (StoredImage, ImageOutcome) {
        match self.store_external(id, payload).await {
            Ok(()) => {
                tracing::debug!(id = %id, len = payload.len(), "image moved to image store");
                return (StoredImage::External, ImageOutcome::Externalized);
            }
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "image store write failed, compressing inline");
            }
        }

        let compressed = self.compressor.compress(payload);
        if compressed.len() <= self.inline_ceiling {
            let outcome = if compressed == payload {
                tracing::debug!(id = %id, len = compressed.len(), "undecodable image kept inline as given");
                ImageOutcome::PassedThrough
            } else {
                tracing::debug!(id = %id, len = compressed.len(), "compressed image kept inline");
                ImageOutcome::Inlined
            };
            (StoredImage::Source(compressed), outcome)
        } else {
            tracing::warn!(
                id = %id,
                len = compressed.len(),
                ceiling = self.inline_ceiling,
                "compressed image still too large, dropping it"
            );
            (StoredImage::None, ImageOutcome::Dropped)
        }
    }

    async fn store_external(&self, id: &str, payload: &str) -> Result<()> {
        let images = self.images.as_ref().ok_or_else(|| {
            PortfolioError::ImageStoreUnavailable("no image store configured".to_string())
        })?;
        images.put(&ImageBlobEntry::new(id, payload)).await
    }

    /// Loads the stored project list, or `seed` if nothing usable is stored.
    pub async fn load_projects(&self, seed: Vec<Project>) -> Vec<Project> {
        match self.load_stored_projects().await {
            Some(projects) => projects,
            None => {
                tracing::debug!(count = seed.len(), "using seed projects");
                seed
            }
        }
    }

    /// Loads the stored project list with images reattached.
    ///
    /// Returns `None` when nothing is stored, the primary store cannot be read, or the
    /// stored list does not parse. Records flagged external or lacking inline image
    /// data are looked up in the image store; a found entry replaces the record's
    /// image. A record whose external image cannot be resolved loads without one.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn load_stored_projects(&self) -> Option<Vec<Project>> {
        let raw = match self.primary.get_item(&self.keys.projects) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("no stored project list");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read project list");
                return None;
            }
        };

        let records: Vec<StoredProject> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "stored project list is malformed");
                return None;
            }
        };

        let projects = join_all(records.into_iter().map(|record| self.restore_record(record))).await;
        tracing::debug!(count = projects.len(), "project list loaded");
        Some(projects)
    }

    async fn restore_record(&self, record: StoredProject) -> Project {
        let needs_lookup =
            !matches!(record.image, StoredImage::Source(ref s) if data_uri::is_image_data_uri(s));
        let mut project = record.into_project();

        if needs_lookup {
            if let Some(image) = self.fetch_external(&project.id).await {
                project.image = image;
            }
        }
        project
    }

    async fn fetch_external(&self, id: &str) -> Option<ProjectImage> {
        let images = self.images.as_ref()?;
        match images.get(id).await {
            Ok(Some(entry)) => {
                let image = ProjectImage::from_source(entry.image_data);
                (!image.is_none()).then_some(image)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "failed to restore image");
                None
            }
        }
    }

    /// Removes every primary-store key except the project list, the signed-in user and
    /// the background image. Best-effort: failures are logged and skipped.
    pub fn sweep(&self) {
        let removed = self.sweep_keys();
        tracing::debug!(removed, "housekeeping sweep finished");
    }

    fn sweep_keys(&self) -> usize {
        let keys = match self.primary.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "housekeeping could not list keys");
                return 0;
            }
        };

        let allow_list = self.keys.allow_list();
        keys.iter()
            .filter(|key| !allow_list.contains(&key.as_str()))
            .filter(|key| match self.primary.remove_item(key) {
                Ok(()) => {
                    tracing::debug!(key = %key, "removed non-essential key");
                    true
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "failed to remove key");
                    false
                }
            })
            .count()
    }
}
