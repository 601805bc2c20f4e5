use std::sync::Arc;

use anyhow::bail;
use dialoguer::Input;
use hub_ai::ChatSession;
use hub_ai::chat::GREETING;

use crate::cli::root_commands::ChatArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::{output, output_text};
use crate::ui;

/// Handle `hub chat`.
pub async fn handle(args: &ChatArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let generator = Arc::new(ctx.generator().await?);
    let mut chat = ChatSession::new(generator);

    if let Some(message) = &args.message {
        let Some(reply) = chat.send(message).await else {
            bail!("chat: message is empty");
        };
        if flags.format == OutputFormat::Table {
            return output_text("reply", &reply.text, flags.format);
        }
        return output(reply, flags.format);
    }

    if !ui::prefs().interactive {
        bail!("chat: pass a MESSAGE or run in an interactive terminal");
    }

    println!("{GREETING}");
    loop {
        let line: String = Input::new().with_prompt("you").allow_empty(true).interact_text()?;
        if is_exit(&line) {
            break;
        }
        if let Some(reply) = chat.send(&line).await {
            println!("{}", reply.text);
        }
    }

    if flags.format != OutputFormat::Table {
        output(&chat.transcript(), flags.format)?;
    }
    Ok(())
}

fn is_exit(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "" | "exit" | "quit" | "/bye")
}
