//! Project listing repository.

use async_trait::async_trait;
use hub_core::entities::Project;
use hub_core::enums::ProjectStatus;

use crate::HubDb;
use crate::error::StoreError;
use crate::helpers::{encode_tags, get_opt_string, parse_datetime, parse_enum, parse_tags};
use crate::ports::ProjectStore;

const COLUMNS: &str = "id, owner_id, title, description, image_url, tags, demo_url, repo_url, \
                       featured, status, category, version, downloads, rating, created_at, updated_at";

fn row_to_project(row: &libsql::Row) -> Result<Project, StoreError> {
    let downloads = row.get::<i64>(12)?;
    #[allow(clippy::cast_possible_truncation)]
    let rating = row.get::<f64>(13)? as f32;
    Ok(Project {
        id: row.get::<String>(0)?,
        owner_id: row.get::<String>(1)?,
        title: row.get::<String>(2)?,
        description: row.get::<String>(3)?,
        image_url: get_opt_string(row, 4)?,
        tags: parse_tags(&row.get::<String>(5)?)?,
        demo_url: get_opt_string(row, 6)?,
        repo_url: get_opt_string(row, 7)?,
        featured: row.get::<i64>(8)? != 0,
        status: parse_enum(&row.get::<String>(9)?)?,
        category: row.get::<String>(10)?,
        version: row.get::<String>(11)?,
        downloads: u64::try_from(downloads).unwrap_or_default(),
        rating,
        created_at: parse_datetime(&row.get::<String>(14)?)?,
        updated_at: parse_datetime(&row.get::<String>(15)?)?,
    })
}

impl HubDb {
    async fn query_projects(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Vec<Project>, StoreError> {
        let mut rows = self.conn.query(sql, params).await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_project(&row)?);
        }
        Ok(results)
    }

    pub(crate) async fn insert_project(&self, project: &Project) -> Result<(), StoreError> {
        self.conn
            .execute(
                &format!(
                    "INSERT INTO projects ({COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
                ),
                libsql::params![
                    project.id.as_str(),
                    project.owner_id.as_str(),
                    project.title.as_str(),
                    project.description.as_str(),
                    project.image_url.as_deref(),
                    encode_tags(&project.tags)?,
                    project.demo_url.as_deref(),
                    project.repo_url.as_deref(),
                    project.featured,
                    project.status.as_str(),
                    project.category.as_str(),
                    project.version.as_str(),
                    i64::try_from(project.downloads).unwrap_or(i64::MAX),
                    f64::from(project.rating),
                    project.created_at.to_rfc3339(),
                    project.updated_at.to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }

    /// Number of stored listings, across all owners and statuses.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn count_projects(&self) -> Result<u64, StoreError> {
        let mut rows = self.conn.query("SELECT COUNT(*) FROM projects", ()).await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| StoreError::Query("COUNT returned no row".to_string()))?;
        Ok(u64::try_from(row.get::<i64>(0)?).unwrap_or_default())
    }
}

#[async_trait]
impl ProjectStore for HubDb {
    async fn list_published(&self) -> Result<Vec<Project>, StoreError> {
        self.query_projects(
            &format!(
                "SELECT {COLUMNS} FROM projects WHERE status = ?1
                 ORDER BY featured DESC, created_at DESC, id"
            ),
            [ProjectStatus::Published.as_str()],
        )
        .await
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Project>, StoreError> {
        self.query_projects(
            &format!("SELECT {COLUMNS} FROM projects WHERE owner_id = ?1 ORDER BY created_at DESC, id"),
            [owner_id],
        )
        .await
    }

    async fn get(&self, id: &str) -> Result<Option<Project>, StoreError> {
        let mut found = self
            .query_projects(&format!("SELECT {COLUMNS} FROM projects WHERE id = ?1"), [id])
            .await?;
        Ok(found.pop())
    }

    async fn create(&self, project: &Project) -> Result<(), StoreError> {
        if self.get(&project.id).await?.is_some() {
            return Err(StoreError::Conflict {
                kind: "project",
                id: project.id.clone(),
            });
        }
        self.insert_project(project).await?;
        tracing::debug!(id = %project.id, owner = %project.owner_id, "project created");
        Ok(())
    }

    async fn update(&self, project: &Project) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute(
                "UPDATE projects SET owner_id = ?2, title = ?3, description = ?4, image_url = ?5,
                   tags = ?6, demo_url = ?7, repo_url = ?8, featured = ?9, status = ?10,
                   category = ?11, version = ?12, downloads = ?13, rating = ?14, updated_at = ?15
                 WHERE id = ?1",
                libsql::params![
                    project.id.as_str(),
                    project.owner_id.as_str(),
                    project.title.as_str(),
                    project.description.as_str(),
                    project.image_url.as_deref(),
                    encode_tags(&project.tags)?,
                    project.demo_url.as_deref(),
                    project.repo_url.as_deref(),
                    project.featured,
                    project.status.as_str(),
                    project.category.as_str(),
                    project.version.as_str(),
                    i64::try_from(project.downloads).unwrap_or(i64::MAX),
                    f64::from(project.rating),
                    project.updated_at.to_rfc3339()
                ],
            )
            .await?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                kind: "project",
                id: project.id.clone(),
            });
        }
        tracing::debug!(id = %project.id, status = %project.status, "project updated");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1", [id])
            .await?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                kind: "project",
                id: id.to_string(),
            });
        }
        tracing::debug!(id, "project deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::{sample_project, test_db};

    #[tokio::test]
    async fn create_then_get_preserves_every_field() {
        let db = test_db().await;
        let mut project = sample_project("app-0000000a", "dev-1", ProjectStatus::Published);
        project.tags = vec!["Rust".into(), "libSQL".into()];
        project.demo_url = Some("https://demo.example.com".into());
        project.downloads = 77;
        project.rating = 4.5;
        db.create(&project).await.unwrap();

        let loaded = db.get("app-0000000a").await.unwrap().unwrap();
        assert_eq!(loaded.tags, project.tags);
        assert_eq!(loaded.demo_url, project.demo_url);
        assert!(loaded.repo_url.is_none());
        assert_eq!(loaded.downloads, 77);
        assert!((loaded.rating - 4.5).abs() < f32::EPSILON);
        assert_eq!(loaded.status, ProjectStatus::Published);
        assert_eq!(loaded.created_at.timestamp(), project.created_at.timestamp());
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let db = test_db().await;
        assert!(db.get("app-ffffffff").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_id() {
        let db = test_db().await;
        let project = sample_project("app-0000000a", "dev-1", ProjectStatus::Draft);
        db.create(&project).await.unwrap();
        let err = db.create(&project).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn list_published_hides_drafts_and_reviews() {
        let db = test_db().await;
        for (id, status) in [
            ("app-00000010", ProjectStatus::Draft),
            ("app-00000011", ProjectStatus::InReview),
            ("app-00000012", ProjectStatus::Published),
        ] {
            db.create(&sample_project(id, "dev-1", status)).await.unwrap();
        }
        let published = db.list_published().await.unwrap();
        let ids: Vec<&str> = published.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["app-00000012"]);
    }

    #[tokio::test]
    async fn list_published_puts_featured_first() {
        let db = test_db().await;
        let now = Utc::now();
        let mut older_featured = sample_project("app-00000020", "dev-1", ProjectStatus::Published);
        older_featured.featured = true;
        older_featured.created_at = now - Duration::days(3);
        let mut newer = sample_project("app-00000021", "dev-1", ProjectStatus::Published);
        newer.created_at = now;
        db.create(&newer).await.unwrap();
        db.create(&older_featured).await.unwrap();

        let ids: Vec<String> = db.list_published().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["app-00000020".to_string(), "app-00000021".to_string()]);
    }

    #[tokio::test]
    async fn list_by_owner_includes_every_status() {
        let db = test_db().await;
        db.create(&sample_project("app-00000030", "dev-1", ProjectStatus::Draft))
            .await
            .unwrap();
        db.create(&sample_project("app-00000031", "dev-1", ProjectStatus::Published))
            .await
            .unwrap();
        db.create(&sample_project("app-00000032", "dev-2", ProjectStatus::Published))
            .await
            .unwrap();

        let mine = db.list_by_owner("dev-1").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|p| p.owner_id == "dev-1"));
    }

    #[tokio::test]
    async fn update_replaces_fields() {
        let db = test_db().await;
        let mut project = sample_project("app-00000040", "dev-1", ProjectStatus::Draft);
        db.create(&project).await.unwrap();

        project.title = "Renamed".into();
        project.status = ProjectStatus::Published;
        project.image_url = None;
        db.update(&project).await.unwrap();

        let loaded = db.get("app-00000040").await.unwrap().unwrap();
        assert_eq!(loaded.title, "Renamed");
        assert_eq!(loaded.status, ProjectStatus::Published);
        assert!(loaded.image_url.is_none());
    }

    #[tokio::test]
    async fn update_and_delete_missing_are_not_found() {
        let db = test_db().await;
        let project = sample_project("app-00000050", "dev-1", ProjectStatus::Draft);
        assert!(matches!(
            db.update(&project).await.unwrap_err(),
            StoreError::NotFound { kind: "project", .. }
        ));
        assert!(matches!(
            db.delete("app-00000050").await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn delete_removes_listing() {
        let db = test_db().await;
        db.create(&sample_project("app-00000060", "dev-1", ProjectStatus::Draft))
            .await
            .unwrap();
        db.delete("app-00000060").await.unwrap();
        assert!(db.get("app-00000060").await.unwrap().is_none());
        assert_eq!(db.count_projects().await.unwrap(), 0);
    }
}
