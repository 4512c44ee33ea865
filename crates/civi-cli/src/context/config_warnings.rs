use civi_config::CiviConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &CiviConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &CiviConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();
    if !config.crm.is_configured() && has_env_prefix(&env_keys, "CIVIBRIDGE_CRM") {
        warnings.push(
            "CRM config appears incomplete while CIVIBRIDGE_CRM* env vars exist. Use double underscores (example: CIVIBRIDGE_CRM__API_KEY)."
                .to_string(),
        );
    }
    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
