use clap::Subcommand;

/// Profile commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProfileCommands {
    /// Show the signed-in account.
    Show,
    /// Become a developer and unlock the console.
    Upgrade,
}
