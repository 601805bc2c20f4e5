use anyhow::Context;
use hub_config::HubConfig;

/// Load `.env` from the working directory, then the layered configuration.
pub fn load_config() -> anyhow::Result<HubConfig> {
    HubConfig::load_with_dotenv().context("failed to load hub configuration")
}
