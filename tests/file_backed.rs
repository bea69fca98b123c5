mod common;

use common::png_data_uri;
use portfolio_store::storage::CurrentUser;
use portfolio_store::{open_file_backed, Config, PortfolioError, Project, ProjectImage};
use std::fs;
use tempfile::tempdir;

fn config_in(dir: &std::path::Path) -> Config {
    Config {
        data_dir: Some(dir.to_string_lossy().into_owned()),
        ..Config::default()
    }
}

#[tokio::test]
async fn file_backed_store_survives_reopening() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());

    let payload = png_data_uri(80, 60);
    let project = Project::new("p1", "Persisted")
        .with_tags(["Print"])
        .with_image(ProjectImage::Inline(payload.clone()));

    {
        let store = open_file_backed(&config).unwrap();
        let report = store.save_projects(&[project]).await.unwrap();
        assert_eq!(report.externalized, 1);
        store
            .set_current_user(&CurrentUser {
                username: "admin".to_string(),
                is_admin: true,
            })
            .unwrap();
    }

    assert!(dir.path().join("local-storage.json").exists());
    assert!(dir.path().join("projectImages.json").exists());
    let primary_file = fs::read_to_string(dir.path().join("local-storage.json")).unwrap();
    assert!(!primary_file.contains(&payload));

    let reopened = open_file_backed(&config).unwrap();
    let loaded = reopened.load_projects(Vec::new()).await;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].tags, ["Print"]);
    assert_eq!(loaded[0].image, ProjectImage::Inline(payload));
    assert_eq!(reopened.current_user().map(|u| u.username), Some("admin".to_string()));
}

#[tokio::test]
async fn configured_quota_applies_to_the_file_store() {
    let dir = tempdir().unwrap();
    let config = Config {
        primary_quota: Some(16),
        ..config_in(dir.path())
    };

    let store = open_file_backed(&config).unwrap();
    let err = store
        .save_projects(&[Project::new("1", "Too big for sixteen bytes")])
        .await
        .unwrap_err();
    assert!(matches!(err, PortfolioError::SaveFailed(_)));
}

#[test]
fn config_loads_from_toml_with_defaults_for_missing_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("portfolio-store.toml");
    fs::write(
        &path,
        r#"
image_store_name = "gallery"
inline_ceiling = 20480
max_image_width = 800
trace_level = "debug"
"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.image_store_name, "gallery");
    assert_eq!(config.inline_ceiling, 20_480);
    assert_eq!(config.max_image_width, 800);
    assert_eq!(config.max_image_height, 350);
    assert_eq!(config.projects_key, "projects");
    assert_eq!(config.trace_level.as_deref(), Some("debug"));
}

#[test]
fn config_file_errors_are_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "inline_ceiling = \"lots\"").unwrap();

    assert!(matches!(Config::from_file(&path), Err(PortfolioError::Config(_))));
    assert!(matches!(
        Config::from_file(dir.path().join("missing.toml")),
        Err(PortfolioError::Config(_))
    ));
}

#[test]
fn invalid_image_store_name_is_rejected() {
    let dir = tempdir().unwrap();
    let config = Config {
        image_store_name: "../escape".to_string(),
        ..config_in(dir.path())
    };

    assert!(matches!(open_file_backed(&config), Err(PortfolioError::Config(_))));
}
