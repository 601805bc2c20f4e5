mod login;
mod logout;
mod status;
mod wizard;

use hub_core::Account;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;
use crate::context::AppContext;

/// Handle `hub auth <subcommand>`.
pub async fn handle(action: &AuthCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => login::handle(args, ctx, flags).await,
        AuthCommands::Logout => logout::handle(ctx, flags).await,
        AuthCommands::Status => status::handle(ctx, flags).await,
    }
}

/// Session summary shared by `auth login`, `auth status`, and `profile`.
#[derive(Debug, Serialize)]
pub(crate) struct SessionSummary {
    pub authenticated: bool,
    pub account_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub email_verified: Option<bool>,
    pub token_source: Option<&'static str>,
    pub note: Option<String>,
}

impl SessionSummary {
    pub(crate) fn signed_out(note: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_id: None,
            email: None,
            name: None,
            role: None,
            email_verified: None,
            token_source: None,
            note: Some(note.into()),
        }
    }

    pub(crate) fn from_account(account: &Account) -> Self {
        Self {
            authenticated: true,
            account_id: Some(account.id.clone()),
            email: Some(account.email.clone()),
            name: Some(account.name.clone()),
            role: Some(account.role.to_string()),
            email_verified: Some(account.email_verified),
            token_source: hub_auth::token_store::detect_token_source(),
            note: (!account.email_verified)
                .then(|| "email not verified; run `hub auth login` to finish".to_string()),
        }
    }
}
