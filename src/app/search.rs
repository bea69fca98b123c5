//! Showcase filtering over the in-memory project list.

use crate::domain::Project;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Returns the projects matching every whitespace-separated token of `query`.
///
/// A token matches a project if it fuzzy-matches its title, category, client or any
/// tag, ignoring case. An empty query matches everything. List order is preserved.
///
/// ```
/// use portfolio_store::app::search_projects;
/// use portfolio_store::domain::Project;
///
/// let projects = vec![
///     Project::new("1", "Harbour Lights").with_tags(["Photography"]),
///     Project::new("2", "Night Market").with_tags(["Branding"]),
/// ];
/// let hits = search_projects(&projects, "brand");
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].id, "2");
/// ```
#[must_use]
pub fn search_projects<'a>(projects: &'a [Project], query: &str) -> Vec<&'a Project> {
    let _span = tracing::debug_span!("search_projects",
        total_projects = projects.len(),
        query_len = query.len()
    ).entered();

    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if tokens.is_empty() {
        return projects.iter().collect();
    }

    let matcher = SkimMatcherV2::default();
    let hits: Vec<&Project> = projects
        .iter()
        .filter(|project| {
            let haystacks = haystacks(project);
            tokens.iter().all(|token| {
                haystacks
                    .iter()
                    .any(|haystack| matcher.fuzzy_match(haystack, token).is_some())
            })
        })
        .collect();

    tracing::debug!(hit_count = hits.len(), "search filter applied");
    hits
}

/// Returns the projects carrying `tag`, ignoring case.
#[must_use]
pub fn projects_with_tag<'a>(projects: &'a [Project], tag: &str) -> Vec<&'a Project> {
    projects.iter().filter(|project| project.has_tag(tag)).collect()
}

fn haystacks(project: &Project) -> Vec<String> {
    let mut fields = vec![project.title.to_lowercase()];
    fields.extend(project.category.iter().map(|c| c.to_lowercase()));
    fields.extend(project.client.iter().map(|c| c.to_lowercase()));
    fields.extend(project.tags.iter().map(|t| t.to_lowercase()));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_projects;

    #[test]
    fn empty_query_returns_everything_in_order() {
        let projects = default_projects();
        let ids: Vec<_> = search_projects(&projects, "   ").iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn every_token_must_match() {
        let projects = default_projects();
        let hits = search_projects(&projects, "scorm safety");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "2");
        assert!(search_projects(&projects, "scorm zzzz").is_empty());
    }

    #[test]
    fn matches_client_and_category() {
        let projects = default_projects();
        assert_eq!(search_projects(&projects, "riverside")[0].id, "5");
        assert_eq!(search_projects(&projects, "Mobile App").len(), 1);
    }

    #[test]
    fn tag_filter_is_exact_but_case_insensitive() {
        let projects = default_projects();
        let ids: Vec<_> = projects_with_tag(&projects, "ux design").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "5", "6"]);
        assert!(projects_with_tag(&projects, "ux").is_empty());
    }
}
