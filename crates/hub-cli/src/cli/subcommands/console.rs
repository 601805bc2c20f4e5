use clap::{Args, Subcommand};

/// Developer console commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ConsoleCommands {
    /// List your listings.
    List,
    /// Create a listing.
    Create(ConsoleCreateArgs),
    /// Edit a listing. Unset flags keep their current value.
    Update(ConsoleUpdateArgs),
    /// Delete a listing.
    Delete { id: String },
}

#[derive(Clone, Debug, Args)]
pub struct ConsoleCreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    /// Screenshot URL (required to publish).
    #[arg(long)]
    pub image_url: Option<String>,
    #[arg(long)]
    pub tag: Vec<String>,
    #[arg(long)]
    pub demo_url: Option<String>,
    #[arg(long)]
    pub repo_url: Option<String>,
    #[arg(long)]
    pub featured: bool,
    /// draft, in_review, or published.
    #[arg(long, default_value = "draft")]
    pub status: String,
    #[arg(long, default_value = "Productivity")]
    pub category: String,
    #[arg(long)]
    pub version: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ConsoleUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub image_url: Option<String>,
    /// Add a tag.
    #[arg(long)]
    pub tag: Vec<String>,
    /// Remove a tag.
    #[arg(long)]
    pub untag: Vec<String>,
    #[arg(long)]
    pub demo_url: Option<String>,
    #[arg(long)]
    pub repo_url: Option<String>,
    #[arg(long)]
    pub featured: Option<bool>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub version: Option<String>,
}
