mod common;

use common::{png_data_uri, CountingImageStore};
use portfolio_store::app::{SAVE_DEGRADED_MESSAGE, SAVE_FAILED_MESSAGE};
use portfolio_store::seed::default_projects;
use portfolio_store::storage::{
    KeyValueStore, MemoryImageStore, MemoryKeyValueStore, PortfolioStore, SaveTier,
};
use portfolio_store::{FlushOutcome, NotificationLevel, PortfolioEditor, Project, ProjectImage};
use std::sync::Arc;

fn stored_ids(primary: &MemoryKeyValueStore) -> Vec<String> {
    let raw = primary.get_item("projects").unwrap().expect("project list written");
    let records: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    records
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn opening_an_empty_store_persists_the_defaults() {
    let primary = Arc::new(MemoryKeyValueStore::default());
    let editor = PortfolioEditor::open(PortfolioStore::new(primary.clone()), default_projects()).await;

    assert_eq!(editor.projects(), default_projects());
    assert_eq!(stored_ids(&primary), ["1", "2", "3", "4", "5", "6"]);
    assert!(editor.take_notifications().is_empty());
}

#[tokio::test]
async fn opening_keeps_a_stored_list() {
    let primary = Arc::new(MemoryKeyValueStore::default());
    let store = PortfolioStore::new(primary.clone());
    store.save_projects(&[Project::new("42", "Stored")]).await.unwrap();

    let editor = PortfolioEditor::open(store, default_projects()).await;
    assert_eq!(editor.projects().len(), 1);
    assert_eq!(editor.project("42").unwrap().title, "Stored");
    assert_eq!(stored_ids(&primary), ["42"]);
}

#[tokio::test]
async fn upsert_replaces_by_id_or_appends() {
    let primary = Arc::new(MemoryKeyValueStore::default());
    let editor = PortfolioEditor::open(PortfolioStore::new(primary.clone()), default_projects()).await;

    let mut renamed = editor.project("3").unwrap();
    renamed.title = "Kiln Studio Rebrand".to_string();
    assert!(matches!(editor.upsert_project(renamed).await, FlushOutcome::Saved(_)));

    let id = editor.new_project_id();
    assert!(editor.project(&id).is_none());
    editor.upsert_project(Project::new(id.clone(), "Fresh")).await;

    let projects = editor.projects();
    assert_eq!(projects.len(), 7);
    assert_eq!(projects[2].title, "Kiln Studio Rebrand");
    assert_eq!(projects[6].id, id);
    assert_eq!(stored_ids(&primary).last(), Some(&id));
}

#[tokio::test]
async fn overlapping_flushes_coalesce_into_one_trailing_save() {
    let primary = Arc::new(MemoryKeyValueStore::default());
    let images = Arc::new(CountingImageStore::default());
    let store = PortfolioStore::new(primary.clone()).with_image_store(images.clone());
    let editor = PortfolioEditor::open(store, Vec::new()).await;

    let with_image = Project::new("a", "Atlas").with_image(ProjectImage::Inline(png_data_uri(16, 16)));
    let mut first = std::pin::pin!(editor.upsert_project(with_image));
    assert!(futures_util::poll!(first.as_mut()).is_pending());
    assert!(editor.is_saving());

    let second = editor.upsert_project(Project::new("b", "Beacon")).await;
    assert_eq!(second, FlushOutcome::Coalesced);

    let FlushOutcome::Saved(report) = first.await else {
        panic!("first flush should have saved");
    };
    assert_eq!(report.records, 2);
    assert!(!editor.is_saving());
    assert_eq!(stored_ids(&primary), ["a", "b"]);
    assert_eq!(images.puts(), 2);
}

#[tokio::test]
async fn failed_save_becomes_an_error_notification() {
    let primary = Arc::new(MemoryKeyValueStore::with_quota(16));
    let editor = PortfolioEditor::open(PortfolioStore::new(primary.clone()), default_projects()).await;

    assert_eq!(editor.projects().len(), 6);
    assert_eq!(primary.get_item("projects").unwrap(), None);

    let notifications = editor.take_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Error);
    assert_eq!(notifications[0].message, SAVE_FAILED_MESSAGE);
    assert!(editor.take_notifications().is_empty());

    assert_eq!(editor.flush().await, FlushOutcome::Failed);
}

#[tokio::test]
async fn essential_only_save_warns() {
    let primary = Arc::new(MemoryKeyValueStore::with_quota(2_000));
    let editor = PortfolioEditor::open(PortfolioStore::new(primary), default_projects()).await;

    let notifications = editor.take_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Warning);
    assert_eq!(notifications[0].message, SAVE_DEGRADED_MESSAGE);

    let FlushOutcome::Saved(report) = editor.flush().await else {
        panic!("essential tier should still save");
    };
    assert_eq!(report.tier, SaveTier::Essential);
}

#[tokio::test]
async fn delete_removes_the_record_but_leaves_its_image() {
    let primary = Arc::new(MemoryKeyValueStore::default());
    let images = Arc::new(MemoryImageStore::default());
    let store = PortfolioStore::new(primary.clone()).with_image_store(images.clone());
    let editor = PortfolioEditor::open(store, default_projects()).await;

    let project = Project::new("pic", "Picture").with_image(ProjectImage::Inline(png_data_uri(24, 24)));
    editor.upsert_project(project).await;
    assert!(images.contains("pic"));

    assert!(matches!(editor.delete_project("pic").await, Some(FlushOutcome::Saved(_))));
    assert!(editor.delete_project("pic").await.is_none());
    assert!(!stored_ids(&primary).contains(&"pic".to_string()));
    assert!(images.contains("pic"));
}

#[tokio::test]
async fn reset_restores_the_defaults() {
    let primary = Arc::new(MemoryKeyValueStore::default());
    let editor = PortfolioEditor::open(PortfolioStore::new(primary.clone()), default_projects()).await;

    editor.delete_project("1").await;
    editor.delete_project("2").await;
    assert_eq!(editor.projects().len(), 4);

    editor.reset_to_defaults().await;
    assert_eq!(editor.projects(), default_projects());
    assert_eq!(stored_ids(&primary).len(), 6);
}

#[tokio::test]
async fn search_runs_over_the_current_list() {
    let editor = PortfolioEditor::open(
        PortfolioStore::new(Arc::new(MemoryKeyValueStore::default())),
        default_projects(),
    )
    .await;

    assert_eq!(editor.search("museum").len(), 1);
    assert_eq!(editor.projects_with_tag("E-Learning").len(), 2);
    assert_eq!(editor.search("").len(), 6);
}
