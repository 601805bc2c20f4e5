use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ProjectStatus;

/// An app listing shown in the hub catalogue and managed in the developer console.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Project {
    pub id: String,
    /// Account id of the developer who owns the listing.
    pub owner_id: String,
    pub title: String,
    pub description: String,
    /// Remote `http(s)` URL or an uploaded `data:` URL.
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub demo_url: Option<String>,
    pub repo_url: Option<String>,
    pub featured: bool,
    pub status: ProjectStatus,
    pub category: String,
    pub version: String,
    pub downloads: u64,
    pub rating: f32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == ProjectStatus::Published
    }

    #[must_use]
    pub fn is_owned_by(&self, account_id: &str) -> bool {
        self.owner_id == account_id
    }
}
