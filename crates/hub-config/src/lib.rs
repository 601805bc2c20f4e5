//! # hub-config
//!
//! Layered configuration loading for AfroTech Hub using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`HUB_*` prefix, `__` as separator)
//! 2. Project-level `.hub/config.toml`
//! 3. User-level `~/.config/hub/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `HUB_IDENTITY__API_KEY` -> `identity.api_key`, `HUB_GEMINI__MODEL` -> `gemini.model`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use hub_config::HubConfig;
//!
//! let config = HubConfig::load_with_dotenv().expect("config");
//!
//! if config.gemini.is_configured() {
//!     println!("Assistant model: {}", config.gemini.model);
//! }
//! ```

mod error;
mod gemini;
mod general;
mod identity;
mod storage;

pub use error::ConfigError;
pub use gemini::GeminiConfig;
pub use general::GeneralConfig;
pub use identity::IdentityConfig;
pub use storage::StorageConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HubConfig {
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl HubConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`load_with_dotenv`](Self::load_with_dotenv)
    /// if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed or a value
    /// has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Loads `.env` from the current directory (if any) before building the
    /// figment. This is the typical entry point for the CLI.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".hub/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("HUB_").split("__"))
    }

    /// Require a section before a command talks to its collaborator.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` naming the section.
    pub fn require(&self, section: Section) -> Result<(), ConfigError> {
        let configured = match section {
            Section::Identity => self.identity.is_configured(),
            Section::Storage => self.storage.is_configured(),
            Section::Gemini => self.gemini.is_configured(),
        };
        if configured {
            Ok(())
        } else {
            Err(ConfigError::NotConfigured {
                section: section.as_str().to_string(),
            })
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hub").join("config.toml"))
    }
}

/// Sections that a command may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Identity,
    Storage,
    Gemini,
}

impl Section {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Storage => "storage",
            Self::Gemini => "gemini",
        }
    }

    /// Environment prefix a user would set for this section.
    #[must_use]
    pub const fn env_prefix(self) -> &'static str {
        match self {
            Self::Identity => "HUB_IDENTITY",
            Self::Storage => "HUB_STORAGE",
            Self::Gemini => "HUB_GEMINI",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = HubConfig::default();
        assert!(!config.identity.is_configured());
        assert!(!config.gemini.is_configured());
        assert!(config.storage.is_configured());
        assert_eq!(config.general.site_name, "AfroTech Hub");
    }

    #[test]
    fn require_reports_missing_section() {
        let config = HubConfig::default();
        let err = config.require(Section::Gemini).unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { ref section } if section == "gemini"));
        assert!(config.require(Section::Storage).is_ok());
    }
}
