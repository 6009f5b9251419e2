//! Environment variable handling for configuration
//!
//! Two mechanisms: `${VAR}` placeholders interpolated into a config file before
//! parsing, and the `<PROVIDER>_API_KEY` / `<PROVIDER>_MODEL` overlay applied to
//! an already built [`DispatchConfig`].

use super::error::ConfigError;
use super::schema::DispatchConfig;
use crate::providers::ProviderType;
use regex::{Captures, Regex};
use std::env;
use std::sync::LazyLock;
use tracing::debug;

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
});

/// Interpolate environment variables in a configuration string
///
/// Fails on the first placeholder whose variable is unset.
pub fn interpolate_env_vars(content: &str) -> Result<String, ConfigError> {
    interpolate_with(content, |name| env::var(name).ok())
}

pub(crate) fn interpolate_with<F>(content: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing: Option<String> = None;

    let result = ENV_VAR_PATTERN.replace_all(content, |cap: &Captures<'_>| {
        let var_name = &cap[1];
        match lookup(var_name) {
            Some(value) => value,
            None => {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(var) => Err(ConfigError::EnvVarNotFound { var }),
        None => Ok(result.into_owned()),
    }
}

/// Names of every `${VAR}` placeholder in `text`
pub fn extract_env_vars(text: &str) -> Vec<String> {
    ENV_VAR_PATTERN
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}

impl DispatchConfig {
    /// Copy of this configuration with process-wide keys and models applied
    ///
    /// For each provider type `P`, `P_API_KEY` and `P_MODEL` (e.g.
    /// `CLAUDE_API_KEY`) replace the key and model of every agent bound to `P`.
    pub fn with_env_overrides(&self) -> DispatchConfig {
        overlay_with(self, |name| env::var(name).ok())
    }
}

pub(crate) fn overlay_with<F>(config: &DispatchConfig, lookup: F) -> DispatchConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = config.clone();
    for provider_type in ProviderType::ALL {
        let prefix = provider_type.as_str().to_uppercase();
        let api_key = lookup(&format!("{}_API_KEY", prefix)).filter(|v| !v.is_empty());
        let model = lookup(&format!("{}_MODEL", prefix)).filter(|v| !v.is_empty());
        if api_key.is_none() && model.is_none() {
            continue;
        }

        for (agent_id, binding) in config.agents.iter_mut() {
            if binding.provider_type.parse::<ProviderType>() != Ok(provider_type) {
                continue;
            }
            if let Some(key) = &api_key {
                binding.provider_settings.set_api_key(key.clone());
            }
            if let Some(model) = &model {
                binding.provider_settings.set_model(model.clone());
            }
            debug!("Applied {} environment overrides to {}", prefix, agent_id);
        }
    }
    config
}
