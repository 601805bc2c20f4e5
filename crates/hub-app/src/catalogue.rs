//! Public catalogue queries behind the home and app-details screens.

use hub_core::entities::Project;
use hub_store::ProjectStore;
use hub_store::error::StoreError;

/// Published listings, featured first. With `featured_only`, just the
/// featured ones.
///
/// # Errors
///
/// Returns `StoreError` if the query fails.
pub async fn list_apps<S: ProjectStore + ?Sized>(
    store: &S,
    featured_only: bool,
) -> Result<Vec<Project>, StoreError> {
    let mut apps = store.list_published().await?;
    if featured_only {
        apps.retain(|p| p.featured);
    }
    Ok(apps)
}

/// A single published listing. Drafts and listings under review are not
/// public and resolve to `None`.
///
/// # Errors
///
/// Returns `StoreError` if the query fails.
pub async fn app_details<S: ProjectStore + ?Sized>(
    store: &S,
    id: &str,
) -> Result<Option<Project>, StoreError> {
    Ok(store.get(id).await?.filter(Project::is_published))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_store::HubDb;
    use pretty_assertions::assert_eq;

    async fn seeded() -> HubDb {
        let db = HubDb::open_local(":memory:").await.unwrap();
        db.seed_catalogue_if_empty().await.unwrap();
        db
    }

    #[tokio::test]
    async fn featured_filter_keeps_only_featured() {
        let db = seeded().await;
        let all = list_apps(&db, false).await.unwrap();
        let featured = list_apps(&db, true).await.unwrap();
        assert_eq!(all.len(), 3);
        let titles: Vec<&str> = featured.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(featured.len(), 2);
        assert!(titles.contains(&"Nebula Dashboard"));
        assert!(titles.contains(&"Gemini Lens"));
    }

    #[tokio::test]
    async fn details_hide_unpublished_listing() {
        let db = seeded().await;
        assert!(app_details(&db, "app-00000001").await.unwrap().is_some());
        assert!(app_details(&db, "app-00000003").await.unwrap().is_none());
        assert!(app_details(&db, "app-ffffffff").await.unwrap().is_none());
    }
}
