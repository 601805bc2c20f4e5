use crate::cli::GlobalFlags;
use crate::commands::auth::SessionSummary;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let summary = if ctx.config.identity.is_configured() {
        let session = ctx.session().await?;
        let summary = session
            .account()
            .map_or_else(|| SessionSummary::signed_out("not signed in"), |a| SessionSummary::from_account(&a));
        session.shutdown();
        summary
    } else {
        SessionSummary::signed_out("HUB_IDENTITY__API_KEY not configured")
    };

    output(&summary, flags.format)
}
