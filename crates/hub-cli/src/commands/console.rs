use std::str::FromStr;

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use hub_app::{Screen, View};
use hub_auth::AuthStep;
use hub_core::entities::Project;
use hub_core::enums::ProjectStatus;
use hub_core::validation::ProjectDraft;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ConsoleCommands;
use crate::cli::subcommands::console::{ConsoleCreateArgs, ConsoleUpdateArgs};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ListingRow {
    id: String,
    title: String,
    status: ProjectStatus,
    featured: bool,
    category: String,
    version: String,
    updated_at: DateTime<Utc>,
}

impl From<Project> for ListingRow {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            title: project.title,
            status: project.status,
            featured: project.featured,
            category: project.category,
            version: project.version,
            updated_at: project.updated_at,
        }
    }
}

#[derive(Serialize)]
struct DeleteResponse {
    deleted: String,
}

/// Handle `hub console <subcommand>`.
pub async fn handle(action: &ConsoleCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let session = ctx.session().await?;
    guard(&session.route(&View::Console).screen)?;
    let console = session.open_console().await?;

    let result = match action {
        ConsoleCommands::List => {
            let rows: Vec<ListingRow> = console.projects().into_iter().map(ListingRow::from).collect();
            output(&rows, flags.format)
        }
        ConsoleCommands::Create(args) => {
            let project = console.create(create_draft(args)?).await?;
            output(&project, flags.format)
        }
        ConsoleCommands::Update(args) => {
            let current = console
                .projects()
                .into_iter()
                .find(|p| p.id == args.id)
                .with_context(|| format!("no listing {} in your console", args.id))?;
            let project = console.update(update_draft(&current, args)?).await?;
            output(&project, flags.format)
        }
        ConsoleCommands::Delete { id } => {
            console.delete(id).await?;
            output(&DeleteResponse { deleted: id.clone() }, flags.format)
        }
    };
    session.shutdown();
    result
}

/// Turn a routed screen into the console or an actionable refusal.
fn guard(screen: &Screen) -> anyhow::Result<()> {
    match screen {
        Screen::Console => Ok(()),
        Screen::Auth(AuthStep::VerifyEmail) => {
            bail!("verify your email first; run `hub auth login` once you have clicked the link")
        }
        Screen::Auth(_) => bail!("not signed in; run `hub auth login`"),
        Screen::DeveloperUpgrade => bail!("the console is for developers; run `hub profile upgrade`"),
        other => bail!("console unavailable ({other})"),
    }
}

fn parse_status(raw: &str) -> anyhow::Result<ProjectStatus> {
    ProjectStatus::from_str(raw).with_context(|| format!("invalid --status '{raw}'"))
}

fn create_draft(args: &ConsoleCreateArgs) -> anyhow::Result<ProjectDraft> {
    let mut draft = ProjectDraft {
        id: None,
        title: args.title.clone(),
        description: args.description.clone(),
        image_url: args.image_url.clone().unwrap_or_default(),
        tags: Vec::new(),
        demo_url: args.demo_url.clone().unwrap_or_default(),
        repo_url: args.repo_url.clone().unwrap_or_default(),
        featured: args.featured,
        status: parse_status(&args.status)?,
        category: args.category.clone(),
        version: args.version.clone().unwrap_or_default(),
    };
    for tag in &args.tag {
        draft.add_tag(tag);
    }
    Ok(draft)
}

fn update_draft(current: &Project, args: &ConsoleUpdateArgs) -> anyhow::Result<ProjectDraft> {
    let mut draft = ProjectDraft::from_project(current);
    let set = |field: &mut String, value: Option<&String>| {
        if let Some(value) = value {
            field.clone_from(value);
        }
    };
    set(&mut draft.title, args.title.as_ref());
    set(&mut draft.description, args.description.as_ref());
    set(&mut draft.image_url, args.image_url.as_ref());
    set(&mut draft.demo_url, args.demo_url.as_ref());
    set(&mut draft.repo_url, args.repo_url.as_ref());
    set(&mut draft.category, args.category.as_ref());
    set(&mut draft.version, args.version.as_ref());
    if let Some(featured) = args.featured {
        draft.featured = featured;
    }
    if let Some(status) = &args.status {
        draft.status = parse_status(status)?;
    }
    for tag in &args.untag {
        draft.remove_tag(tag);
    }
    for tag in &args.tag {
        draft.add_tag(tag);
    }
    Ok(draft)
}
