//! Application layer: the editing session on top of the store.
//!
//! - [`editor`]: [`PortfolioEditor`], the canonical list with its in-flight save guard
//!   and toast notifications
//! - [`search`]: showcase search and tag filtering

pub mod editor;
pub mod search;

pub use editor::{
    FlushOutcome, Notification, NotificationLevel, PortfolioEditor, SAVE_DEGRADED_MESSAGE,
    SAVE_FAILED_MESSAGE,
};
pub use search::{projects_with_tag, search_projects};
