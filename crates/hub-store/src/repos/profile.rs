//! Profile document repository.

use async_trait::async_trait;
use hub_core::entities::Profile;

use crate::HubDb;
use crate::error::StoreError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::ports::ProfileStore;

fn row_to_profile(row: &libsql::Row) -> Result<Profile, StoreError> {
    Ok(Profile {
        account_id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        role: parse_enum(&row.get::<String>(2)?)?,
        avatar: get_opt_string(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

#[async_trait]
impl ProfileStore for HubDb {
    async fn get_profile(&self, account_id: &str) -> Result<Option<Profile>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT account_id, name, role, avatar, created_at FROM profiles WHERE account_id = ?1",
                [account_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_profile(&row)?)),
            None => Ok(None),
        }
    }

    async fn put_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO profiles (account_id, name, role, avatar, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(account_id) DO UPDATE SET name = ?2, role = ?3, avatar = ?4",
                libsql::params![
                    profile.account_id.as_str(),
                    profile.name.as_str(),
                    profile.role.as_str(),
                    profile.avatar.as_deref(),
                    profile.created_at.to_rfc3339()
                ],
            )
            .await?;
        tracing::debug!(account = %profile.account_id, role = %profile.role, "profile stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use hub_core::enums::Role;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::test_db;

    fn profile(role: Role) -> Profile {
        Profile {
            account_id: "acc-1".into(),
            name: "Ada".into(),
            role,
            avatar: None,
            created_at: Utc::now() - Duration::days(1),
        }
    }

    #[tokio::test]
    async fn absent_profile_is_none() {
        let db = test_db().await;
        assert!(db.get_profile("acc-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_then_get() {
        let db = test_db().await;
        db.put_profile(&profile(Role::User)).await.unwrap();
        let loaded = db.get_profile("acc-1").await.unwrap().unwrap();
        assert_eq!(loaded.name, "Ada");
        assert_eq!(loaded.role, Role::User);
        assert!(loaded.avatar.is_none());
    }

    #[tokio::test]
    async fn put_overwrites_but_keeps_created_at() {
        let db = test_db().await;
        let original = profile(Role::User);
        db.put_profile(&original).await.unwrap();

        let mut upgraded = original.clone();
        upgraded.role = Role::Developer;
        upgraded.avatar = Some("https://example.com/ada.png".into());
        upgraded.created_at = Utc::now();
        db.put_profile(&upgraded).await.unwrap();

        let loaded = db.get_profile("acc-1").await.unwrap().unwrap();
        assert_eq!(loaded.role, Role::Developer);
        assert_eq!(loaded.avatar.as_deref(), Some("https://example.com/ada.png"));
        assert_eq!(loaded.created_at.timestamp(), original.created_at.timestamp());
    }
}
