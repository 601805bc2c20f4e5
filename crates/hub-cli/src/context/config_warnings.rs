use hub_config::{HubConfig, Section};

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &HubConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &HubConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    [
        (Section::Identity, config.identity.is_configured()),
        (Section::Gemini, config.gemini.is_configured()),
    ]
    .into_iter()
    .filter(|(section, configured)| !configured && has_env_prefix(&env_keys, section.env_prefix()))
    .map(|(section, _)| {
        format!(
            "{name} config appears default while {prefix}* env vars exist. Use double underscores (example: {prefix}__API_KEY).",
            name = section.as_str(),
            prefix = section.env_prefix(),
        )
    })
    .collect()
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
