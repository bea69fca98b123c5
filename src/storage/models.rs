//! Storage record models for the persistence layer.
//!
//! These are the shapes written to the primary and image stores. They are kept
//! separate from the domain [`Project`] so that the in-memory model never has to know
//! where its image bytes physically live.

use crate::domain::{ImageOffset, ImageScale, Project, ProjectImage, ProjectLink};
use serde::{Deserialize, Serialize};

/// Where a light record's image lives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StoredImage {
    /// No image persisted for this record.
    #[default]
    None,
    /// A remote URL, or an inline payload already under the inline ceiling.
    Source(String),
    /// The payload lives in the image store under the record id.
    External,
}

/// A light project record, as serialized into the primary store.
///
/// Never carries an original-size inline payload. On the wire the image is the
/// `image` field plus an `imageStoredExternally` flag; when stored data has both, the
/// flag wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireProject", into = "WireProject")]
pub struct StoredProject {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub image: StoredImage,
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

impl StoredProject {
    /// Builds a light record from a project, with the image already resolved.
    #[must_use]
    pub fn from_project(project: &Project, image: StoredImage) -> Self {
        Self {
            id: project.id.clone(),
            title: project.title.clone(),
            description: project.description.clone(),
            tags: project.tags.clone(),
            image,
            image_position: project.image_position,
            image_scale: project.image_scale,
            client: project.client.clone(),
            year: project.year.clone(),
            category: project.category.clone(),
            full_description: project.full_description.clone(),
            challenge: project.challenge.clone(),
            solution: project.solution.clone(),
            results: project.results.clone(),
            attributes: project.attributes.clone(),
            links: project.links.clone(),
            video_url: project.video_url.clone(),
        }
    }

    /// Converts back into an in-memory project.
    ///
    /// An `External` image becomes [`ProjectImage::None`] here; the caller is expected
    /// to reattach the payload from the image store.
    #[must_use]
    pub fn into_project(self) -> Project {
        let image = match self.image {
            StoredImage::Source(source) => ProjectImage::from_source(source),
            StoredImage::None | StoredImage::External => ProjectImage::None,
        };

        Project {
            id: self.id,
            title: self.title,
            description: self.description,
            tags: self.tags,
            image,
            image_position: self.image_position,
            image_scale: self.image_scale,
            client: self.client,
            year: self.year,
            category: self.category,
            full_description: self.full_description,
            challenge: self.challenge,
            solution: self.solution,
            results: self.results,
            attributes: self.attributes,
            links: self.links,
            video_url: self.video_url,
        }
    }
}

/// Serde representation of [`StoredProject`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProject {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    image_stored_externally: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_position: Option<ImageOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_scale: Option<ImageScale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    full_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    challenge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    solution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    results: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    links: Vec<ProjectLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video_url: Option<String>,
}

impl From<WireProject> for StoredProject {
    fn from(wire: WireProject) -> Self {
        let image = if wire.image_stored_externally {
            StoredImage::External
        } else {
            wire.image
                .filter(|source| !source.trim().is_empty())
                .map_or(StoredImage::None, StoredImage::Source)
        };

        Self {
            id: wire.id,
            title: wire.title,
            description: wire.description,
            tags: wire.tags,
            image,
            image_position: wire.image_position,
            image_scale: wire.image_scale,
            client: wire.client,
            year: wire.year,
            category: wire.category,
            full_description: wire.full_description,
            challenge: wire.challenge,
            solution: wire.solution,
            results: wire.results,
            attributes: wire.attributes,
            links: wire.links,
            video_url: wire.video_url,
        }
    }
}

impl From<StoredProject> for WireProject {
    fn from(record: StoredProject) -> Self {
        let (image, image_stored_externally) = match record.image {
            StoredImage::None => (None, false),
            StoredImage::Source(source) => (Some(source), false),
            StoredImage::External => (None, true),
        };

        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            tags: record.tags,
            image,
            image_stored_externally,
            image_position: record.image_position,
            image_scale: record.image_scale,
            client: record.client,
            year: record.year,
            category: record.category,
            full_description: record.full_description,
            challenge: record.challenge,
            solution: record.solution,
            results: record.results,
            attributes: record.attributes,
            links: record.links,
            video_url: record.video_url,
        }
    }
}

/// The last-resort record shape: only the fields a listing cannot do without.
///
/// Always flags its image as external, whatever the project had.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssentialProject {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub image_stored_externally: bool,
}

impl From<&Project> for EssentialProject {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            title: project.title.clone(),
            description: project.description.clone(),
            tags: project.tags.clone(),
            category: project.category.clone(),
            image_stored_externally: true,
        }
    }
}

/// An entry in the image store, keyed by project id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBlobEntry {
    pub id: String,
    pub image_data: String,
}

impl ImageBlobEntry {
    pub fn new(id: impl Into<String>, image_data: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image_data: image_data.into(),
        }
    }
}

/// The signed-in user, persisted under the active-user key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub username: String,
    pub is_admin: bool,
}

/// Repository coordinates for the GitHub-backed image browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubRepoSettings {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_flag_serializes_without_image_field() {
        let record = StoredProject {
            id: "9".to_string(),
            title: "Dunes".to_string(),
            image: StoredImage::External,
            ..StoredProject::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["imageStoredExternally"], true);
        assert!(json.get("image").is_none());
    }

    #[test]
    fn external_flag_wins_over_stray_inline_data() {
        let json = r#"{"id":"1","title":"t","description":"d","tags":[],
            "image":"data:image/png;base64,AAAA","imageStoredExternally":true}"#;
        let record: StoredProject = serde_json::from_str(json).unwrap();
        assert_eq!(record.image, StoredImage::External);
    }

    #[test]
    fn essential_records_load_as_light_records() {
        let project = Project::new("3", "Kiln")
            .with_description("Ceramics studio identity")
            .with_tags(["branding"])
            .with_category("Identity")
            .with_image(ProjectImage::Url("https://example.com/k.jpg".to_string()));

        let json = serde_json::to_string(&vec![EssentialProject::from(&project)]).unwrap();
        let records: Vec<StoredProject> = serde_json::from_str(&json).unwrap();

        assert_eq!(records[0].title, "Kiln");
        assert_eq!(records[0].category.as_deref(), Some("Identity"));
        assert_eq!(records[0].image, StoredImage::External);
        assert!(records[0].client.is_none());
    }

    #[test]
    fn blob_entries_use_camel_case() {
        let json = serde_json::to_string(&ImageBlobEntry::new("5", "data:image/png;base64,AA")).unwrap();
        assert!(json.contains("\"imageData\""));
    }
}
