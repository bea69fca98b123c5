//! Domain layer for the portfolio store.
//!
//! This module contains the in-memory types callers work with, independent of where
//! and how records are persisted. A [`Project`] in memory is always "whole": its image
//! is either absent, a remote URL, or the full inline payload. Where the bytes live on
//! disk is a storage concern and never shows up here.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`project`]: Project model and its image representation
//!
//! # Examples
//!
//! ```
//! use portfolio_store::domain::{Project, ProjectImage};
//!
//! let project = Project::new("42", "Harbour Lights")
//!     .with_image(ProjectImage::from_source("https://example.com/harbour.jpg"));
//! assert!(project.image.is_url());
//! ```

pub mod error;
pub mod project;

pub use error::{PortfolioError, Result};
pub use project::{ImageOffset, ImageScale, Project, ProjectImage, ProjectLink};
