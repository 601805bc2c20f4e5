use anyhow::bail;
use hub_core::Account;
use hub_core::entities::{ChatMessage, Profile, Project};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Handle `hub schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.type_name.as_str() {
        "account" => schema_for!(Account),
        "project" => schema_for!(Project),
        "profile" => schema_for!(Profile),
        "chat-message" => schema_for!(ChatMessage),
        other => bail!("unknown type '{other}' (expected account, project, profile, or chat-message)"),
    };
    output(&schema, flags.format)
}
