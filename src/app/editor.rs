//! The admin editor's view of the project list.
//!
//! [`PortfolioEditor`] holds the canonical in-memory list and flushes it through
//! [`PortfolioStore`] after every change. Flushes are guarded by an in-flight flag
//! rather than a timer: a flush requested while another is running is coalesced into
//! one trailing save of the newest list.
//!
//! Save failures never reach the caller as errors. They become [`Notification`]s for
//! the UI to show as toasts, and the in-memory list stays authoritative.

use crate::app::search;
use crate::domain::Project;
use crate::storage::memory::lock;
use crate::storage::{PortfolioStore, SaveReport, SaveTier};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Toast text shown when the project list could not be persisted at all.
pub const SAVE_FAILED_MESSAGE: &str =
    "Failed to save all project data due to storage limitations.";

/// Toast text shown when only the essential project fields could be persisted.
pub const SAVE_DEGRADED_MESSAGE: &str =
    "Storage is almost full: only basic project details were saved.";

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Warning,
    Error,
}

/// A non-blocking message for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Result of a [`PortfolioEditor::flush`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    /// The list was written.
    Saved(SaveReport),
    /// Another flush was running; it will save the newest list when it finishes.
    Coalesced,
    /// Every persistence tier failed; a notification was queued.
    Failed,
}

/// Owner of the canonical project list for an editing session.
#[derive(Debug)]
pub struct PortfolioEditor {
    store: PortfolioStore,
    defaults: Vec<Project>,
    projects: Mutex<Vec<Project>>,
    notifications: Mutex<Vec<Notification>>,
    saving: AtomicBool,
    pending: AtomicBool,
}

impl PortfolioEditor {
    /// Loads the project list from `store`, falling back to `defaults`.
    ///
    /// When nothing usable was stored the defaults are persisted right away, so the
    /// next load sees the same list.
    pub async fn open(store: PortfolioStore, defaults: Vec<Project>) -> Self {
        let stored = store.load_stored_projects().await;
        let from_storage = stored.is_some();
        let projects = stored.unwrap_or_else(|| defaults.clone());

        tracing::debug!(count = projects.len(), from_storage, "editor opened");

        let editor = Self {
            store,
            defaults,
            projects: Mutex::new(projects),
            notifications: Mutex::new(Vec::new()),
            saving: AtomicBool::new(false),
            pending: AtomicBool::new(false),
        };

        if !from_storage {
            editor.flush().await;
        }
        editor
    }

    /// The underlying store, for settings access.
    #[must_use]
    pub const fn store(&self) -> &PortfolioStore {
        &self.store
    }

    /// A snapshot of the current list.
    #[must_use]
    pub fn projects(&self) -> Vec<Project> {
        lock(&self.projects).clone()
    }

    #[must_use]
    pub fn project(&self, id: &str) -> Option<Project> {
        lock(&self.projects).iter().find(|p| p.id == id).cloned()
    }

    /// Returns an id no current project uses, derived from the current time.
    #[must_use]
    pub fn new_project_id(&self) -> String {
        let projects = lock(&self.projects);
        let mut candidate = chrono::Utc::now().timestamp_millis();
        while projects.iter().any(|p| p.id == candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }

    /// Replaces the project with the same id, or appends it, then flushes.
    pub async fn upsert_project(&self, project: Project) -> FlushOutcome {
        {
            let mut projects = lock(&self.projects);
            if let Some(existing) = projects.iter_mut().find(|p| p.id == project.id) {
                tracing::debug!(id = %project.id, "updating project");
                *existing = project;
            } else {
                tracing::debug!(id = %project.id, "adding project");
                projects.push(project);
            }
        }
        self.flush().await
    }

    /// Removes the project with `id` and flushes. Returns `None` if there was none.
    ///
    /// The project's entry in the image store is left in place.
    pub async fn delete_project(&self, id: &str) -> Option<FlushOutcome> {
        let removed = {
            let mut projects = lock(&self.projects);
            let before = projects.len();
            projects.retain(|p| p.id != id);
            projects.len() != before
        };

        if !removed {
            tracing::debug!(id = %id, "no project to delete");
            return None;
        }

        tracing::debug!(id = %id, "project deleted");
        Some(self.flush().await)
    }

    /// Replaces the whole list with the defaults and flushes.
    pub async fn reset_to_defaults(&self) -> FlushOutcome {
        *lock(&self.projects) = self.defaults.clone();
        tracing::debug!(count = self.defaults.len(), "projects reset to defaults");
        self.flush().await
    }

    /// Returns `true` while a flush is writing.
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    /// Persists the current list.
    ///
    /// If a flush is already running this returns [`FlushOutcome::Coalesced`] at once
    /// and the running flush saves again with the newest list before finishing.
    pub async fn flush(&self) -> FlushOutcome {
        if self.saving.swap(true, Ordering::SeqCst) {
            self.pending.store(true, Ordering::SeqCst);
            tracing::debug!("save already in flight, coalescing");
            return FlushOutcome::Coalesced;
        }

        loop {
            let outcome = self.save_while_pending().await;
            if !self.release_or_reacquire() {
                return outcome;
            }
            tracing::debug!("flush coalesced while releasing, saving again");
        }
    }

    /// Saves until no flush was coalesced into the running one.
    async fn save_while_pending(&self) -> FlushOutcome {
        loop {
            self.pending.store(false, Ordering::SeqCst);
            let snapshot = self.projects();

            let outcome = match self.store.save_projects(&snapshot).await {
                Ok(report) => {
                    if report.tier == SaveTier::Essential {
                        self.notify(NotificationLevel::Warning, SAVE_DEGRADED_MESSAGE);
                    }
                    FlushOutcome::Saved(report)
                }
                Err(e) => {
                    tracing::error!(error = %e, "saving projects failed");
                    self.notify(NotificationLevel::Error, SAVE_FAILED_MESSAGE);
                    FlushOutcome::Failed
                }
            };

            if !self.pending.load(Ordering::SeqCst) {
                return outcome;
            }
            tracing::debug!("list changed during save, saving again");
        }
    }

    /// Clears the in-flight flag. Returns `true` if a flush was coalesced after the last
    /// pending check and this caller took the flag back to save it.
    fn release_or_reacquire(&self) -> bool {
        self.saving.store(false, Ordering::SeqCst);
        self.pending.load(Ordering::SeqCst) && !self.saving.swap(true, Ordering::SeqCst)
    }

    fn notify(&self, level: NotificationLevel, message: &str) {
        lock(&self.notifications).push(Notification {
            level,
            message: message.to_string(),
        });
    }

    /// Drains queued notifications, oldest first.
    pub fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut *lock(&self.notifications))
    }

    /// Projects matching `query`; see [`search::search_projects`].
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Project> {
        let projects = lock(&self.projects);
        search::search_projects(&projects, query).into_iter().cloned().collect()
    }

    /// Projects carrying `tag`, ignoring case.
    #[must_use]
    pub fn projects_with_tag(&self, tag: &str) -> Vec<Project> {
        let projects = lock(&self.projects);
        search::projects_with_tag(&projects, tag).into_iter().cloned().collect()
    }
}
