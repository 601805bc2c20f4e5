use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Apps(args) => commands::apps::handle_list(&args, ctx, flags).await,
        Commands::App(args) => commands::apps::handle_details(&args, ctx, flags).await,
        Commands::Auth { action } => commands::auth::handle(&action, ctx, flags).await,
        Commands::Profile { action } => commands::profile::handle(&action, ctx, flags).await,
        Commands::Console { action } => commands::console::handle(&action, ctx, flags).await,
        Commands::Chat(args) => commands::chat::handle(&args, ctx, flags).await,
        Commands::Draft(args) => commands::draft::handle(&args, ctx, flags).await,
        Commands::About | Commands::Schema(_) => {
            unreachable!("about/schema are pre-dispatched in main")
        }
    }
}
