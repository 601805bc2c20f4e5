use anyhow::bail;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProfileCommands;
use crate::commands::auth::SessionSummary;
use crate::context::AppContext;
use crate::output::output;
use crate::ui;

/// Handle `hub profile <subcommand>`.
pub async fn handle(action: &ProfileCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let session = ctx.session().await?;
    let result = match action {
        ProfileCommands::Show => match session.account() {
            Some(account) => output(&SessionSummary::from_account(&account), flags.format),
            None => bail!("not signed in; run `hub auth login`"),
        },
        ProfileCommands::Upgrade => {
            let account = session.upgrade_to_developer().await?;
            if !account.email_verified {
                ui::note(flags, "Developer role granted. Verify your email to open the console.");
            }
            output(&SessionSummary::from_account(&account), flags.format)
        }
    };
    session.shutdown();
    result
}
