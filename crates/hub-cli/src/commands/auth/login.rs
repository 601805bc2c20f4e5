use anyhow::bail;
use hub_auth::AuthEvent;

use super::SessionSummary;
use super::wizard;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::ui;

pub async fn handle(args: &AuthLoginArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let federated = ctx.config.identity.supports_federated();
    if args.google && !federated {
        bail!("Google sign-in needs HUB_IDENTITY__FEDERATED_SIGN_IN_URL");
    }

    let session = ctx.session().await?;
    if let Some(account) = session.account()
        && account.email_verified
    {
        ui::note(flags, &format!("Already signed in as {}", account.email));
        return output(&SessionSummary::from_account(&account), flags.format);
    }

    let interactive = ui::prefs().interactive;
    if !interactive && !args.google {
        bail!("auth login: the sign-in wizard needs an interactive terminal");
    }

    let mut flow = session.auth_flow();
    if args.google {
        ui::note(flags, "Opening the browser to sign in with Google...");
        flow.dispatch(AuthEvent::FederatedSignIn).await;
    }

    loop {
        let state = flow.state();
        if state.exited().is_some() {
            break;
        }
        if let Some(message) = state.error() {
            eprintln!("✗ {message}");
            if !interactive {
                bail!("{message}");
            }
        }
        if let Some(message) = state.success() {
            ui::note(flags, message);
        }
        let Some(event) = wizard::prompt(state, federated)? else {
            break;
        };
        flow.dispatch(event).await;
    }

    // The flow's account may predate the profile overlay; read the session.
    session.refresh().await;
    let summary = session
        .account()
        .map_or_else(|| SessionSummary::signed_out("not signed in"), |a| SessionSummary::from_account(&a));
    session.shutdown();
    output(&summary, flags.format)
}
