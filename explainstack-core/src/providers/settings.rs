//! Provider settings
//!
//! Configuration hands each adapter an opaque key/value bag. Adapters resolve
//! that bag into [`ResolvedSettings`] once, at construction, and never look at
//! it again; building a new adapter is the only way to change settings.

use crate::config::{redact_by_field_name, SecretString};
use crate::error::{DispatchError, DispatchResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

const API_KEY: &[&str] = &["api_key", "apiKey"];
const MODEL: &[&str] = &["model"];
const TEMPERATURE: &[&str] = &["temperature"];
const MAX_TOKENS: &[&str] = &["max_tokens", "maxTokens"];
const BASE_URL: &[&str] = &["base_url", "baseUrl"];

/// Temperature used when the settings bag does not name one
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Output token cap used when the settings bag does not name one
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Opaque settings bag for one provider binding
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderSettings {
    values: BTreeMap<String, Value>,
}

impl ProviderSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Find the first present key among a set of aliases
    pub fn lookup<'a>(&'a self, aliases: &[&'a str]) -> Option<(&'a str, &'a Value)> {
        aliases
            .iter()
            .find_map(|alias| self.values.get(*alias).map(|value| (*alias, value)))
    }

    /// Replace the value under whichever api key alias is in use
    pub fn set_api_key(&mut self, key: impl Into<String>) {
        let alias = self
            .lookup(API_KEY)
            .map(|(alias, _)| alias.to_string())
            .unwrap_or_else(|| API_KEY[0].to_string());
        self.values.insert(alias, Value::String(key.into()));
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.values
            .insert(MODEL[0].to_string(), Value::String(model.into()));
    }

    pub fn has_api_key(&self) -> bool {
        self.lookup(API_KEY).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.values {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            map.entry(key, &redact_by_field_name(key, &rendered));
        }
        map.finish()
    }
}

/// Per-call parameter overrides; any field set here wins over stored settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOverrides {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub model: Option<String>,
}

impl CallOverrides {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Parameters of one outgoing request after overrides are applied
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Typed, validated view of a [`ProviderSettings`] bag
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    raw: ProviderSettings,
    pub api_key: SecretString,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub base_url: String,
}

impl ResolvedSettings {
    /// Validate a settings bag for the named provider
    ///
    /// `api_key` and `model` are required. `temperature`, `max_tokens` and
    /// `base_url` fall back to the defaults when absent.
    pub fn resolve(
        provider: &str,
        settings: &ProviderSettings,
        default_base_url: &str,
    ) -> DispatchResult<Self> {
        let api_key = required_string(provider, settings, API_KEY)?;
        let model = required_string(provider, settings, MODEL)?;
        if model.trim().is_empty() {
            return Err(invalid(provider, MODEL[0], "must not be empty"));
        }

        let temperature = match settings.lookup(TEMPERATURE) {
            None => DEFAULT_TEMPERATURE,
            Some((key, value)) => value
                .as_f64()
                .filter(|t| t.is_finite())
                .map(|t| t as f32)
                .ok_or_else(|| invalid(provider, key, "expected a number"))?,
        };

        let max_tokens = match settings.lookup(MAX_TOKENS) {
            None => DEFAULT_MAX_TOKENS,
            Some((key, value)) => value
                .as_u64()
                .filter(|n| *n > 0)
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| invalid(provider, key, "expected a positive integer"))?,
        };

        let base_url = match settings.lookup(BASE_URL) {
            None => default_base_url.to_string(),
            Some((key, value)) => {
                let raw = value
                    .as_str()
                    .ok_or_else(|| invalid(provider, key, "expected a string"))?;
                url::Url::parse(raw).map_err(|e| invalid(provider, key, &e.to_string()))?;
                raw.to_string()
            }
        };

        Ok(Self {
            raw: settings.clone(),
            api_key: SecretString::new(api_key),
            model,
            temperature,
            max_tokens,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The bag these settings were resolved from
    pub fn raw(&self) -> &ProviderSettings {
        &self.raw
    }

    /// Merge per-call overrides on top of the stored settings
    pub fn effective(&self, overrides: &CallOverrides) -> EffectiveParams {
        EffectiveParams {
            model: overrides.model.clone().unwrap_or_else(|| self.model.clone()),
            temperature: overrides.temperature.unwrap_or(self.temperature),
            max_tokens: overrides.max_tokens.unwrap_or(self.max_tokens),
        }
    }
}

fn required_string(
    provider: &str,
    settings: &ProviderSettings,
    aliases: &[&str],
) -> DispatchResult<String> {
    match settings.lookup(aliases) {
        None => Err(DispatchError::MissingProviderSetting {
            provider: provider.to_string(),
            key: aliases[0].to_string(),
        }),
        Some((key, value)) => value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| invalid(provider, key, "expected a string")),
    }
}

fn invalid(provider: &str, key: &str, message: &str) -> DispatchError {
    DispatchError::InvalidProviderSetting {
        provider: provider.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    }
}
