use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Sign in or create an account (interactive).
    Login(AuthLoginArgs),
    /// Sign out and clear stored credentials.
    Logout,
    /// Show current auth status.
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// Sign in with Google in the browser instead of email and password.
    #[arg(long)]
    pub google: bool,
}
