use figment::Jail;
use hub_config::HubConfig;

#[test]
fn env_vars_fill_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("HUB_IDENTITY__API_KEY", "AIza-env");
        jail.set_env("HUB_GEMINI__MODEL", "gemini-2.5-flash");

        let config = HubConfig::load().expect("config loads");
        assert_eq!(config.identity.api_key, "AIza-env");
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        Ok(())
    });
}

#[test]
fn project_local_toml_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".hub")?;
        jail.create_file(
            ".hub/config.toml",
            r#"
[storage]
path = "local.db"
"#,
        )?;

        let config = HubConfig::load().expect("config loads");
        assert_eq!(config.storage.path, "local.db");
        Ok(())
    });
}

#[test]
fn single_underscore_does_not_nest() {
    Jail::expect_with(|jail| {
        jail.set_env("HUB_IDENTITY_API_KEY", "AIza-typo");

        let config = HubConfig::load().expect("config loads");
        assert!(!config.identity.is_configured());
        Ok(())
    });
}
