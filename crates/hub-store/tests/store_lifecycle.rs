//! End-to-end store behavior through the public ports, on a file-backed
//! database that is closed and reopened between steps.

use chrono::Utc;
use hub_config::StorageConfig;
use hub_core::catalogue::STUDIO_OWNER_ID;
use hub_core::entities::{Profile, Project};
use hub_core::enums::{ProjectStatus, Role};
use hub_store::error::StoreError;
use hub_store::{HubDb, ProfileStore, ProjectStore};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn config(dir: &TempDir) -> StorageConfig {
    StorageConfig {
        path: dir.path().join("hub.db").to_string_lossy().into_owned(),
        seed_catalogue: true,
    }
}

fn listing(id: &str, owner: &str) -> Project {
    let now = Utc::now();
    Project {
        id: id.to_string(),
        owner_id: owner.to_string(),
        title: "Harmattan Weather".to_string(),
        description: "Dust forecasts for the Sahel".to_string(),
        image_url: None,
        tags: vec!["Rust".to_string(), "Maps".to_string()],
        demo_url: Some("https://weather.example.com".to_string()),
        repo_url: None,
        featured: false,
        status: ProjectStatus::Draft,
        category: "Weather".to_string(),
        version: "0.1.0".to_string(),
        downloads: 0,
        rating: 0.0,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn developer_listing_survives_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let db = HubDb::open(&config(&dir)).await.unwrap();
        assert_eq!(db.list_published().await.unwrap().len(), 3);
        db.create(&listing("app-0000abcd", "uid-0001")).await.unwrap();
    }

    let db = HubDb::open(&config(&dir)).await.unwrap();
    let mine = db.list_by_owner("uid-0001").await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].tags, vec!["Rust".to_string(), "Maps".to_string()]);
    assert_eq!(db.list_by_owner(STUDIO_OWNER_ID).await.unwrap().len(), 4);

    // Drafts stay out of the public catalogue until published.
    assert!(db.list_published().await.unwrap().iter().all(|p| p.id != "app-0000abcd"));

    let mut published = mine[0].clone();
    published.status = ProjectStatus::Published;
    published.image_url = Some("https://picsum.photos/800/600".to_string());
    db.update(&published).await.unwrap();
    assert!(db.list_published().await.unwrap().iter().any(|p| p.id == "app-0000abcd"));

    db.delete("app-0000abcd").await.unwrap();
    assert!(matches!(
        db.delete("app-0000abcd").await,
        Err(StoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn duplicate_ids_conflict() {
    let db = HubDb::open_local(":memory:").await.unwrap();
    db.create(&listing("app-00000042", "uid-0001")).await.unwrap();
    assert!(matches!(
        db.create(&listing("app-00000042", "uid-0002")).await,
        Err(StoreError::Conflict { .. })
    ));
}

#[tokio::test]
async fn profile_role_upgrade_persists() {
    let dir = TempDir::new().unwrap();
    let created_at = Utc::now();
    {
        let db = HubDb::open(&config(&dir)).await.unwrap();
        db.put_profile(&Profile {
            account_id: "uid-0001".into(),
            name: "Ada".into(),
            role: Role::User,
            avatar: None,
            created_at,
        })
        .await
        .unwrap();
        let mut upgraded = db.get_profile("uid-0001").await.unwrap().unwrap();
        upgraded.role = Role::Developer;
        db.put_profile(&upgraded).await.unwrap();
    }

    let db = HubDb::open(&config(&dir)).await.unwrap();
    let profile = db.get_profile("uid-0001").await.unwrap().unwrap();
    assert_eq!(profile.role, Role::Developer);
    assert_eq!(profile.created_at.timestamp(), created_at.timestamp());
    assert!(db.get_profile("uid-9999").await.unwrap().is_none());
}
