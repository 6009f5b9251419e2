//! Provider factory
//!
//! Builds adapters from a declarative type name plus a settings bag. The
//! factory keeps no state and no cache: every call yields a fresh adapter.

use crate::error::{DispatchError, DispatchResult};
use crate::providers::adapter::{ProviderAdapter, ProviderType};
use crate::providers::settings::ProviderSettings;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Anything that can turn a (type, settings) pair into an adapter
///
/// The registry depends on this trait rather than on [`ProviderFactory`]
/// directly so that alternative construction strategies can be plugged in.
pub trait AdapterFactory: Send + Sync {
    /// Build one adapter for the named provider type
    fn create(&self, provider_type: &str, settings: &ProviderSettings) -> DispatchResult<Arc<dyn ProviderAdapter>>;

    /// Provider type names this factory accepts
    fn supported_types(&self) -> Vec<&'static str>;
}

/// Descriptive information about a provider type, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendInfo {
    pub name: String,
    pub description: String,
    pub models: String,
}

/// The stock factory over the registered [`ProviderType`] set
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a type name against the registered set
    pub fn parse_type(&self, provider_type: &str) -> DispatchResult<ProviderType> {
        provider_type
            .parse::<ProviderType>()
            .map_err(|_| DispatchError::UnsupportedProviderType {
                requested: provider_type.to_string(),
                available: self.supported_types().into_iter().map(str::to_string).collect(),
            })
    }

    /// Display information for a provider type name
    pub fn backend_info(&self, provider_type: &str) -> BackendInfo {
        let (name, description, models) = match provider_type.parse::<ProviderType>() {
            Ok(ProviderType::OpenAI) => (
                "OpenAI",
                "GPT models from OpenAI",
                "GPT-4, GPT-3.5-turbo, GPT-4-turbo",
            ),
            Ok(ProviderType::Claude) => (
                "Claude",
                "Claude models from Anthropic",
                "Claude-3 Opus, Sonnet, Haiku",
            ),
            Ok(ProviderType::Gemini) => (
                "Gemini",
                "Gemini models from Google",
                "Gemini Pro, Gemini 1.5 Pro, Flash",
            ),
            Err(_) => ("Unknown", "Unknown backend", "Unknown"),
        };

        BackendInfo {
            name: name.to_string(),
            description: description.to_string(),
            models: models.to_string(),
        }
    }
}

impl AdapterFactory for ProviderFactory {
    fn create(&self, provider_type: &str, settings: &ProviderSettings) -> DispatchResult<Arc<dyn ProviderAdapter>> {
        let parsed = self.parse_type(provider_type)?;
        info!("Creating {} backend", parsed);

        parsed.create_adapter(settings).map_err(|e| {
            error!("Failed to create {} backend: {}", parsed, e);
            e
        })
    }

    fn supported_types(&self) -> Vec<&'static str> {
        ProviderType::ALL.iter().map(ProviderType::as_str).collect()
    }
}
