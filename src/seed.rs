//! Default showcase projects.
//!
//! Used whenever nothing usable is stored, and by "reset to defaults". All images are
//! remote URLs, so persisting the seed never touches the image store.

use crate::domain::{ImageOffset, ImageScale, Project, ProjectImage};

#[allow(clippy::too_many_arguments)]
fn project(
    id: &str,
    title: &str,
    description: &str,
    tags: &[&str],
    category: &str,
    client: &str,
    year: &str,
    image: &str,
) -> Project {
    Project {
        client: Some(client.to_string()),
        year: Some(year.to_string()),
        image_position: Some(ImageOffset::default()),
        image_scale: Some(ImageScale::default()),
        ..Project::new(id, title)
            .with_description(description)
            .with_tags(tags.iter().copied())
            .with_category(category)
            .with_image(ProjectImage::Url(image.to_string()))
    }
}

/// Returns the six default projects, ids `"1"` through `"6"`.
///
/// ```
/// let projects = portfolio_store::seed::default_projects();
/// assert_eq!(projects.len(), 6);
/// assert!(projects.iter().all(|p| p.image.is_url()));
/// ```
#[must_use]
pub fn default_projects() -> Vec<Project> {
    vec![
        project(
            "1",
            "E-Learning Platform Redesign",
            "A complete overhaul of a corporate learning portal, focused on course discovery and accessibility.",
            &["UX Design", "E-Learning", "Accessibility"],
            "Web Design",
            "Northwind Learning",
            "2023",
            "https://images.unsplash.com/photo-1501504905252-473c47e087f8?w=800",
        ),
        project(
            "2",
            "Interactive Safety Training",
            "Scenario-based SCORM modules that walk warehouse staff through hazard recognition.",
            &["Instructional Design", "SCORM", "Storyline"],
            "E-Learning",
            "Harbor Logistics",
            "2023",
            "https://images.unsplash.com/photo-1581092918056-0c4c3acd3789?w=800",
        ),
        project(
            "3",
            "Brand Identity for Kiln Studio",
            "Logo, typography and packaging system for an independent ceramics studio.",
            &["Branding", "Print", "Typography"],
            "Branding",
            "Kiln Studio",
            "2022",
            "https://images.unsplash.com/photo-1565193566173-7a0ee3dbe261?w=800",
        ),
        project(
            "4",
            "Onboarding Microlearning Series",
            "Twelve five-minute lessons that replaced a two-day onboarding workshop.",
            &["Microlearning", "Video", "E-Learning"],
            "E-Learning",
            "Brightpath Health",
            "2022",
            "https://images.unsplash.com/photo-1522202176988-66273c2fd55f?w=800",
        ),
        project(
            "5",
            "Museum Companion App",
            "A mobile guide with audio tours and indoor maps for a regional history museum.",
            &["Mobile", "UX Design", "Prototyping"],
            "Mobile App",
            "Riverside Museum",
            "2021",
            "https://images.unsplash.com/photo-1554907984-15263bfd63bd?w=800",
        ),
        project(
            "6",
            "Sales Enablement Dashboard",
            "Data visualisations that turn quarterly sales figures into coaching conversations.",
            &["Data Visualization", "Dashboard", "UX Design"],
            "Web Design",
            "Crestline Partners",
            "2021",
            "https://images.unsplash.com/photo-1551288049-bebda4e38f71?w=800",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_ids_are_unique() {
        let projects = default_projects();
        let ids: HashSet<_> = projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), projects.len());
    }

    #[test]
    fn seed_has_categories_and_tags() {
        for project in default_projects() {
            assert!(project.category.is_some(), "{} has no category", project.id);
            assert!(!project.tags.is_empty(), "{} has no tags", project.id);
        }
    }
}
