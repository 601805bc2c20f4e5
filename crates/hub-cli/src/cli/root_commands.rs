use clap::{Args, Subcommand};

use crate::cli::subcommands::{AuthCommands, ConsoleCommands, ProfileCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// List published apps.
    Apps(AppsArgs),
    /// Show one published app.
    App(AppArgs),
    /// About the studio and how to reach it.
    About,
    /// Sign in, sign out, and session status.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// The signed-in account's profile.
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },
    /// Developer console: manage your own listings.
    Console {
        #[command(subcommand)]
        action: ConsoleCommands,
    },
    /// Talk to the hub assistant.
    Chat(ChatArgs),
    /// Draft a contact message about a topic.
    Draft(DraftArgs),
    /// Dump the JSON schema of an output type.
    Schema(SchemaArgs),
}

/// Arguments for `hub apps`.
#[derive(Clone, Debug, Args)]
pub struct AppsArgs {
    /// Only featured apps.
    #[arg(long)]
    pub featured: bool,
}

/// Arguments for `hub app`.
#[derive(Clone, Debug, Args)]
pub struct AppArgs {
    pub id: String,
}

/// Arguments for `hub chat`.
#[derive(Clone, Debug, Args)]
pub struct ChatArgs {
    /// Send one message and exit. Without it, start an interactive chat.
    pub message: Option<String>,
}

/// Arguments for `hub draft`.
#[derive(Clone, Debug, Args)]
pub struct DraftArgs {
    pub topic: String,
}

/// Arguments for `hub schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// One of: account, project, profile, chat-message.
    pub type_name: String,
}
