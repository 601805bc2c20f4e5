//! Developer console form validation.
//!
//! A [`ProjectDraft`] is the editable form behind the console. It is validated
//! locally before any storage call; failures are reported per field so the
//! front end can show each message next to its input.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::entities::Project;
use crate::enums::ProjectStatus;

const MSG_TITLE_REQUIRED: &str = "App Name is required";
const MSG_DESCRIPTION_REQUIRED: &str = "Description is required";
const MSG_IMAGE_REQUIRED: &str = "Image is required to publish";
const MSG_INVALID_URL: &str = "Invalid URL format (must start with http:// or https://)";

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectField {
    Title,
    Description,
    ImageUrl,
    DemoUrl,
    RepoUrl,
}

impl ProjectField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::ImageUrl => "image_url",
            Self::DemoUrl => "demo_url",
            Self::RepoUrl => "repo_url",
        }
    }
}

impl fmt::Display for ProjectField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-scoped validation failures. Never empty when returned as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectValidationErrors(BTreeMap<ProjectField, String>);

impl ProjectValidationErrors {
    fn insert(&mut self, field: ProjectField, message: &str) {
        self.0.insert(field, message.to_string());
    }

    #[must_use]
    pub fn get(&self, field: ProjectField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: ProjectField) -> bool {
        self.0.contains_key(&field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProjectField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

impl fmt::Display for ProjectValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(field, msg)| format!("{field}: {msg}")).collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ProjectValidationErrors {}

/// Editable form state for a project listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDraft {
    /// `Some` when editing an existing listing.
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub tags: Vec<String>,
    pub demo_url: String,
    pub repo_url: String,
    pub featured: bool,
    pub status: ProjectStatus,
    pub category: String,
    pub version: String,
}

impl ProjectDraft {
    /// Pre-fill the form from an existing listing.
    #[must_use]
    pub fn from_project(project: &Project) -> Self {
        Self {
            id: Some(project.id.clone()),
            title: project.title.clone(),
            description: project.description.clone(),
            image_url: project.image_url.clone().unwrap_or_default(),
            tags: project.tags.clone(),
            demo_url: project.demo_url.clone().unwrap_or_default(),
            repo_url: project.repo_url.clone().unwrap_or_default(),
            featured: project.featured,
            status: project.status,
            category: project.category.clone(),
            version: project.version.clone(),
        }
    }

    /// Append a trimmed, non-empty, not-yet-present tag.
    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if !tag.is_empty() && !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// Validate the form.
    ///
    /// - title and description must be non-empty after trimming
    /// - an image is required only when the status is `published`
    /// - `demo_url`, `repo_url`, and a non-`data:` `image_url`, when non-empty,
    ///   must be absolute `http`/`https` URLs with a host
    ///
    /// # Errors
    ///
    /// Returns every failing field at once.
    pub fn validate(&self) -> Result<(), ProjectValidationErrors> {
        let mut errors = ProjectValidationErrors::default();

        if self.title.trim().is_empty() {
            errors.insert(ProjectField::Title, MSG_TITLE_REQUIRED);
        }
        if self.description.trim().is_empty() {
            errors.insert(ProjectField::Description, MSG_DESCRIPTION_REQUIRED);
        }

        let image = self.image_url.trim();
        if image.is_empty() {
            if self.status == ProjectStatus::Published {
                errors.insert(ProjectField::ImageUrl, MSG_IMAGE_REQUIRED);
            }
        } else if !is_data_image(image) && !is_web_url(image) {
            errors.insert(ProjectField::ImageUrl, MSG_INVALID_URL);
        }

        for (field, value) in [
            (ProjectField::DemoUrl, &self.demo_url),
            (ProjectField::RepoUrl, &self.repo_url),
        ] {
            let value = value.trim();
            if !value.is_empty() && !is_web_url(value) {
                errors.insert(field, MSG_INVALID_URL);
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Build the stored listing. Call only after [`validate`](Self::validate) succeeds.
    ///
    /// `existing` carries the fields the form does not edit (owner, counters,
    /// creation time) when updating.
    #[must_use]
    pub fn into_project(
        self,
        id: String,
        owner_id: &str,
        existing: Option<&Project>,
        now: DateTime<Utc>,
    ) -> Project {
        Project {
            id,
            owner_id: existing.map_or_else(|| owner_id.to_string(), |p| p.owner_id.clone()),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            image_url: non_empty(self.image_url),
            tags: self.tags,
            demo_url: non_empty(self.demo_url),
            repo_url: non_empty(self.repo_url),
            featured: self.featured,
            status: self.status,
            category: self.category.trim().to_string(),
            version: if self.version.trim().is_empty() {
                "1.0.0".to_string()
            } else {
                self.version.trim().to_string()
            },
            downloads: existing.map_or(0, |p| p.downloads),
            rating: existing.map_or(0.0, |p| p.rating),
            created_at: existing.map_or(now, |p| p.created_at),
            updated_at: now,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn is_data_image(value: &str) -> bool {
    value.starts_with("data:image/")
}

/// An absolute `http`/`https` URL with a host.
#[must_use]
pub fn is_web_url(value: &str) -> bool {
    // `Url::parse` accepts "example.com:8080" as scheme "example.com"; require
    // the scheme separator explicitly.
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return false;
    }
    Url::parse(value).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}
