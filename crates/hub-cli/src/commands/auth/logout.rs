use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthLogoutResponse {
    cleared: bool,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if ctx.config.identity.is_configured() {
        let session = ctx.session().await?;
        session.sign_out().await?;
        session.shutdown();
    } else {
        hub_auth::forget_credentials()?;
    }
    output(&AuthLogoutResponse { cleared: true }, flags.format)
}
