//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use hub_config::HubConfig;

#[test]
fn loads_identity_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[identity]
api_key = "AIza-toml"
base_url = "http://127.0.0.1:9099/identitytoolkit.googleapis.com/v1"
federated_sign_in_url = "https://hub.example.com/google"
callback_timeout_secs = 30
"#,
        )?;

        let config: HubConfig = Figment::from(Serialized::defaults(HubConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.identity.api_key, "AIza-toml");
        assert!(config.identity.base_url.starts_with("http://127.0.0.1:9099"));
        assert_eq!(config.identity.callback_timeout_secs, 30);
        assert!(config.identity.supports_federated());
        // Unset fields keep their defaults.
        assert_eq!(config.identity.token_url, "https://securetoken.googleapis.com/v1/token");
        Ok(())
    });
}

#[test]
fn loads_gemini_and_storage_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[gemini]
api_key = "gm-key"
temperature = 0.2

[storage]
path = ":memory:"
seed_catalogue = false
"#,
        )?;

        let config: HubConfig = Figment::from(Serialized::defaults(HubConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(config.gemini.is_configured());
        assert!((config.gemini.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.gemini.model, "gemini-3-flash-preview");
        assert!(config.storage.is_in_memory());
        assert!(!config.storage.seed_catalogue);
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
site_name = "From TOML"
"#,
        )?;
        jail.set_env("HUB_GENERAL__SITE_NAME", "From Env");

        let config: HubConfig = Figment::from(Serialized::defaults(HubConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("HUB_").split("__"))
            .extract()?;

        assert_eq!(config.general.site_name, "From Env");
        Ok(())
    });
}
