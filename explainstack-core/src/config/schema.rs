//! Configuration schema
//!
//! Maps agent ids to provider bindings. Provider type names stay plain strings
//! here so that an unsupported type surfaces from the factory, at realization
//! time, rather than as a parse failure.

use super::secrets::SecretString;
use crate::providers::{ProviderSettings, ProviderType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Root configuration consumed by the agent registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Agent id to provider binding
    #[serde(default, alias = "backends")]
    pub agents: BTreeMap<String, AgentBinding>,

    /// Input length limits for front ends
    #[serde(default)]
    pub validation: InputLimits,
}

/// Provider binding for one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentBinding {
    #[serde(alias = "providerType", alias = "type")]
    pub provider_type: String,

    #[serde(default, alias = "providerSettings", alias = "config")]
    pub provider_settings: ProviderSettings,
}

impl AgentBinding {
    pub fn new(provider_type: impl Into<String>, provider_settings: ProviderSettings) -> Self {
        Self {
            provider_type: provider_type.into(),
            provider_settings,
        }
    }
}

/// Accepted input length range, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLimits {
    #[serde(default = "default_min_input_length")]
    pub min_input_length: usize,

    #[serde(default = "default_max_input_length")]
    pub max_input_length: usize,
}

fn default_min_input_length() -> usize {
    1
}

fn default_max_input_length() -> usize {
    10_000
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            min_input_length: default_min_input_length(),
            max_input_length: default_max_input_length(),
        }
    }
}

/// Per-user API keys and model preferences
///
/// Overlaid on a shared configuration with [`DispatchConfig::with_credentials`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserCredentials {
    #[serde(default)]
    pub api_keys: HashMap<ProviderType, SecretString>,

    /// Agent id to preferred model
    #[serde(default)]
    pub preferred_models: BTreeMap<String, String>,
}

impl UserCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, provider_type: ProviderType, key: impl Into<SecretString>) -> Self {
        self.api_keys.insert(provider_type, key.into());
        self
    }

    pub fn with_preferred_model(mut self, agent_id: impl Into<String>, model: impl Into<String>) -> Self {
        self.preferred_models.insert(agent_id.into(), model.into());
        self
    }

    /// The user's key for a provider type, if set and non-empty
    pub fn api_key(&self, provider_type: ProviderType) -> Option<&SecretString> {
        self.api_keys.get(&provider_type).filter(|key| !key.is_empty())
    }
}

impl DispatchConfig {
    pub fn new() -> Self {
        Self {
            agents: BTreeMap::new(),
            validation: InputLimits::default(),
        }
    }

    /// Builder-style binding insert
    pub fn with_agent(
        mut self,
        agent_id: impl Into<String>,
        provider_type: impl Into<String>,
        provider_settings: ProviderSettings,
    ) -> Self {
        self.agents
            .insert(agent_id.into(), AgentBinding::new(provider_type, provider_settings));
        self
    }

    pub fn binding(&self, agent_id: &str) -> Option<&AgentBinding> {
        self.agents.get(agent_id)
    }

    /// Copy of this configuration with a user's keys and model preferences applied
    ///
    /// A user key replaces the configured key of every agent bound to that
    /// key's provider type. Bindings with an unrecognized provider type are
    /// left untouched.
    pub fn with_credentials(&self, credentials: &UserCredentials) -> DispatchConfig {
        let mut config = self.clone();
        for (agent_id, binding) in config.agents.iter_mut() {
            if let Ok(provider_type) = binding.provider_type.parse::<ProviderType>() {
                if let Some(key) = credentials.api_key(provider_type) {
                    binding.provider_settings.set_api_key(key.expose_secret());
                }
            }
            if let Some(model) = credentials.preferred_models.get(agent_id) {
                binding.provider_settings.set_model(model.clone());
            }
        }
        config
    }
}

fn stock_settings(model: &str, temperature: f64, max_tokens: u32) -> ProviderSettings {
    ProviderSettings::new()
        .with("api_key", "")
        .with("model", model)
        .with("temperature", temperature)
        .with("max_tokens", max_tokens)
}

impl Default for DispatchConfig {
    /// The stock deployment: OpenAI everywhere except Claude for patch review,
    /// with empty API keys waiting for an environment or per-user overlay
    fn default() -> Self {
        DispatchConfig::new()
            .with_agent("code_expert", "openai", stock_settings("gpt-4", 0.3, 2000))
            .with_agent(
                "patch_reviewer",
                "claude",
                stock_settings("claude-3-sonnet-20240229", 0.2, 3000),
            )
            .with_agent("import_cleaner", "openai", stock_settings("gpt-3.5-turbo", 0.1, 1000))
            .with_agent("commit_writer", "openai", stock_settings("gpt-4", 0.3, 1500))
            .with_agent("security_expert", "openai", stock_settings("gpt-4", 0.2, 2500))
            .with_agent("performance_expert", "openai", stock_settings("gpt-4", 0.2, 2500))
    }
}
