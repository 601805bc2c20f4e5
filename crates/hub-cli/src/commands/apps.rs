use anyhow::anyhow;
use hub_app::catalogue;
use hub_core::entities::Project;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{AppArgs, AppsArgs};
use crate::context::AppContext;
use crate::output::output;

/// One line of the catalogue.
#[derive(Debug, Serialize)]
struct AppRow {
    id: String,
    title: String,
    category: String,
    featured: bool,
    version: String,
    downloads: u64,
    rating: f32,
    tags: String,
}

impl From<Project> for AppRow {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            title: project.title,
            category: project.category,
            featured: project.featured,
            version: project.version,
            downloads: project.downloads,
            rating: project.rating,
            tags: project.tags.join(", "),
        }
    }
}

/// Handle `hub apps`.
pub async fn handle_list(args: &AppsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let apps = catalogue::list_apps(ctx.db.as_ref(), args.featured).await?;
    let rows: Vec<AppRow> = apps.into_iter().map(AppRow::from).collect();
    output(&rows, flags.format)
}

/// Handle `hub app <id>`.
pub async fn handle_details(args: &AppArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let project = catalogue::app_details(ctx.db.as_ref(), &args.id)
        .await?
        .ok_or_else(|| anyhow!("app not found: {}", args.id))?;
    output(&project, flags.format)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use hub_core::catalogue::seed_projects;

    use super::AppRow;

    #[test]
    fn row_joins_tags() {
        let project = seed_projects(Utc::now()).remove(0);
        let row = AppRow::from(project);
        assert_eq!(row.tags, "React, TypeScript, D3.js, Node.js");
        assert!(row.featured);
    }
}
