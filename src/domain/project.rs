//! Project domain model.
//!
//! This module defines [`Project`], the unit the showcase displays and the admin area
//! edits, together with [`ProjectImage`], the in-memory image representation.

use crate::media::data_uri;
use serde::{Deserialize, Serialize};

/// Placement offset of a project image inside its frame, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOffset {
    pub x: i32,
    pub y: i32,
}

/// Display scale of a project image, as percentages of its natural size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageScale {
    pub width: f64,
    pub height: f64,
}

impl Default for ImageScale {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
        }
    }
}

/// An additional link shown on a project's detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLink {
    pub label: String,
    pub url: String,
}

/// The image attached to a project, as held in memory.
///
/// There is no "stored elsewhere" variant: by the time a project reaches
/// callers, any image kept in the image store has been reattached as [`Inline`].
///
/// [`Inline`]: ProjectImage::Inline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProjectImage {
    /// No image, or the stored image could not be resolved.
    #[default]
    None,
    /// A remote image referenced by URL.
    Url(String),
    /// An encoded image payload in `data:image/...` form.
    Inline(String),
}

impl ProjectImage {
    /// Classifies an image source string as it comes from an editor form or storage.
    ///
    /// Blank strings are [`ProjectImage::None`], `data:image/` URIs are inline payloads
    /// and anything else is treated as a URL.
    ///
    /// ```
    /// use portfolio_store::domain::ProjectImage;
    ///
    /// assert_eq!(ProjectImage::from_source("  "), ProjectImage::None);
    /// assert!(ProjectImage::from_source("data:image/png;base64,iVBORw0KGgo=").is_inline());
    /// assert!(ProjectImage::from_source("/img/cover.jpg").is_url());
    /// ```
    #[must_use]
    pub fn from_source(source: impl Into<String>) -> Self {
        let source = source.into();
        if source.trim().is_empty() {
            Self::None
        } else if data_uri::is_image_data_uri(&source) {
            Self::Inline(source)
        } else {
            Self::Url(source)
        }
    }

    /// Returns the URL or payload, if any.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Url(url) => Some(url),
            Self::Inline(payload) => Some(payload),
        }
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    #[must_use]
    pub const fn is_url(&self) -> bool {
        matches!(self, Self::Url(_))
    }

    #[must_use]
    pub const fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }

    /// Returns the inline payload, if this image is one.
    #[must_use]
    pub fn inline_payload(&self) -> Option<&str> {
        match self {
            Self::Inline(payload) => Some(payload),
            _ => None,
        }
    }
}

/// A portfolio project.
///
/// `id` is stable for the life of the record and is the join key between the project
/// list and the image store. Tags keep their order and may repeat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub image: ProjectImage,
    pub image_position: Option<ImageOffset>,
    pub image_scale: Option<ImageScale>,
    pub client: Option<String>,
    pub year: Option<String>,
    pub category: Option<String>,
    pub full_description: Option<String>,
    pub challenge: Option<String>,
    pub solution: Option<String>,
    pub results: Option<String>,
    pub attributes: Vec<String>,
    pub links: Vec<ProjectLink>,
    pub video_url: Option<String>,
}

impl Project {
    /// Creates a project with only an id and title set.
    ///
    /// ```
    /// use portfolio_store::domain::Project;
    ///
    /// let project = Project::new("7", "Night Market");
    /// assert_eq!(project.id, "7");
    /// assert!(project.tags.is_empty());
    /// assert!(project.image.is_none());
    /// ```
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: ProjectImage) -> Self {
        self.image = image;
        self
    }

    /// Returns `true` if any tag equals `tag`, ignoring case.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }
}
