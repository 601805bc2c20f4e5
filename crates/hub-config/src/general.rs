//! General application configuration.

use hub_core::catalogue::{SITE_BIO, SITE_NAME, SITE_ROLE};
use serde::{Deserialize, Serialize};

/// Default client-level timeout for collaborator HTTP calls.
const fn default_http_timeout_secs() -> u64 {
    30
}

fn default_site_name() -> String {
    SITE_NAME.to_string()
}

fn default_site_role() -> String {
    SITE_ROLE.to_string()
}

fn default_site_bio() -> String {
    SITE_BIO.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Business name shown in the hero, about page, and assistant persona.
    #[serde(default = "default_site_name")]
    pub site_name: String,

    #[serde(default = "default_site_role")]
    pub site_role: String,

    #[serde(default = "default_site_bio")]
    pub site_bio: String,

    /// Timeout applied to every identity and generative-text HTTP request.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
            site_role: default_site_role(),
            site_bio: default_site_bio(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}
