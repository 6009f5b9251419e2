//! Strict configuration validation
//!
//! The registry tolerates bindings it will never realize; the validator does
//! not. Run it on configurations loaded from files before building a registry.

use super::error::{ValidationError, ValidationErrorKind};
use super::schema::{AgentBinding, DispatchConfig};
use crate::agents::AgentKind;
use crate::providers::{ProviderSettings, ProviderType};
use serde_json::Value;

/// Configuration validator
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigValidator {
    allow_empty_api_keys: bool,
}

impl ConfigValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept empty API keys, for configurations that will receive per-user
    /// credentials before a registry is built from them
    pub fn allow_empty_api_keys(mut self) -> Self {
        self.allow_empty_api_keys = true;
        self
    }

    /// Validate a configuration, failing on the first problem found
    pub fn validate(&self, config: &DispatchConfig) -> Result<(), ValidationError> {
        for (agent_id, binding) in &config.agents {
            self.validate_binding(agent_id, binding)?;
        }
        self.validate_input_limits(config)
    }

    fn validate_binding(&self, agent_id: &str, binding: &AgentBinding) -> Result<(), ValidationError> {
        let path = format!("agents.{}", agent_id);

        if AgentKind::from_id(agent_id).is_none() {
            let known: Vec<&str> = AgentKind::ALL.iter().map(AgentKind::id).collect();
            return Err(ValidationError::new(
                path,
                ValidationErrorKind::UnknownAgent {
                    id: agent_id.to_string(),
                },
            )
            .with_context(format!("known agents: {}", known.join(", "))));
        }

        if binding.provider_type.parse::<ProviderType>().is_err() {
            return Err(ValidationError::new(
                format!("{}.provider_type", path),
                ValidationErrorKind::UnsupportedProvider {
                    provider_type: binding.provider_type.clone(),
                },
            ));
        }

        self.validate_settings(&format!("{}.provider_settings", path), &binding.provider_settings)
    }

    fn validate_settings(&self, path: &str, settings: &ProviderSettings) -> Result<(), ValidationError> {
        match settings.lookup(&["api_key", "apiKey"]) {
            None => return Err(ValidationError::required(format!("{}.api_key", path))),
            Some((key, value)) => {
                let field = format!("{}.{}", path, key);
                let key_value = value
                    .as_str()
                    .ok_or_else(|| ValidationError::invalid_value(&field, "string", kind_of(value)))?;
                if key_value.trim().is_empty() && !self.allow_empty_api_keys {
                    return Err(ValidationError::required(field).with_context("API key is empty"));
                }
            }
        }

        match settings.get("model") {
            None => return Err(ValidationError::required(format!("{}.model", path))),
            Some(value) => {
                let field = format!("{}.model", path);
                let model = value
                    .as_str()
                    .ok_or_else(|| ValidationError::invalid_value(&field, "string", kind_of(value)))?;
                if model.trim().is_empty() {
                    return Err(ValidationError::required(field).with_context("model is empty"));
                }
            }
        }

        if let Some(value) = settings.get("temperature") {
            let field = format!("{}.temperature", path);
            let temperature = value
                .as_f64()
                .ok_or_else(|| ValidationError::invalid_value(&field, "number", kind_of(value)))?;
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ValidationError::out_of_range(
                    field,
                    format!("temperature must be between 0 and 2, got {}", temperature),
                ));
            }
        }

        if let Some((key, value)) = settings.lookup(&["max_tokens", "maxTokens"]) {
            let field = format!("{}.{}", path, key);
            match value.as_u64() {
                Some(0) => {
                    return Err(ValidationError::out_of_range(field, "max_tokens must be positive"))
                }
                Some(_) => {}
                None => return Err(ValidationError::invalid_value(field, "positive integer", kind_of(value))),
            }
        }

        if let Some((key, value)) = settings.lookup(&["base_url", "baseUrl"]) {
            let field = format!("{}.{}", path, key);
            let raw = value
                .as_str()
                .ok_or_else(|| ValidationError::invalid_value(&field, "string", kind_of(value)))?;
            if let Err(e) = url::Url::parse(raw) {
                return Err(ValidationError::new(
                    field,
                    ValidationErrorKind::InvalidUrl {
                        message: e.to_string(),
                    },
                ));
            }
        }

        Ok(())
    }

    fn validate_input_limits(&self, config: &DispatchConfig) -> Result<(), ValidationError> {
        let limits = &config.validation;
        if limits.min_input_length > limits.max_input_length {
            return Err(ValidationError::out_of_range(
                "validation.min_input_length",
                format!(
                    "min_input_length ({}) exceeds max_input_length ({})",
                    limits.min_input_length, limits.max_input_length
                ),
            ));
        }
        Ok(())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
