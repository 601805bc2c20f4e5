use hub_ai::TextGenerator;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::DraftArgs;
use crate::context::AppContext;
use crate::output::output_text;

/// Handle `hub draft <topic>`.
pub async fn handle(args: &DraftArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let generator = ctx.generator().await?;
    let draft = generator.draft_message(&args.topic).await?;
    output_text("draft", &draft, flags.format)
}
