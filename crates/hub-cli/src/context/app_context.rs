use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use hub_ai::GeminiClient;
use hub_ai::prompt::system_instruction;
use hub_app::AppSession;
use hub_auth::RestIdentityProvider;
use hub_config::{HubConfig, Section};
use hub_store::{HubDb, ProjectStore};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: HubConfig,
    pub db: Arc<HubDb>,
}

impl AppContext {
    /// Open the store. Identity and the assistant are connected on demand.
    pub async fn init(config: HubConfig) -> anyhow::Result<Self> {
        let db = HubDb::open(&config.storage)
            .await
            .with_context(|| format!("failed to open store at {}", config.storage.path))?;
        Ok(Self {
            config,
            db: Arc::new(db),
        })
    }

    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.config.general.http_timeout_secs)
    }

    /// Connect the identity provider, restore the stored session, and start
    /// the application session.
    pub async fn session(&self) -> anyhow::Result<AppSession> {
        self.config.require(Section::Identity).with_context(|| {
            format!(
                "sign-in needs an Identity Toolkit API key (set {}__API_KEY)",
                Section::Identity.env_prefix()
            )
        })?;
        let provider =
            RestIdentityProvider::new(self.config.identity.clone(), self.http_timeout(), self.db.clone())?
                .with_persisted_credentials();
        if let Err(error) = provider.restore().await {
            tracing::warn!(%error, "could not restore the previous session");
        }
        Ok(AppSession::start(Arc::new(provider), self.db.clone(), self.db.clone()).await)
    }

    /// Assistant client primed with the published catalogue.
    pub async fn generator(&self) -> anyhow::Result<GeminiClient> {
        self.config.require(Section::Gemini).with_context(|| {
            format!("the assistant needs a Gemini API key (set {}__API_KEY)", Section::Gemini.env_prefix())
        })?;
        let published = self.db.list_published().await?;
        let instruction = system_instruction(&self.config.general, &published);
        Ok(GeminiClient::new(
            self.config.gemini.clone(),
            self.config.general.site_name.clone(),
            instruction,
            self.http_timeout(),
        )?)
    }
}
