use hub_config::HubConfig;
use hub_core::catalogue::{SOCIALS, SocialLink};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct AboutResponse<'a> {
    name: &'a str,
    role: &'a str,
    bio: &'a str,
    socials: &'static [SocialLink],
}

/// Handle `hub about`.
pub fn handle(config: &HubConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(
        &AboutResponse {
            name: &config.general.site_name,
            role: &config.general.site_role,
            bio: &config.general.site_bio,
            socials: SOCIALS,
        },
        flags.format,
    )
}
