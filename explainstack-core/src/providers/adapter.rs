//! Provider adapter trait and provider types
//!
//! Defines the uniform contract every LLM backend implements and the closed
//! set of backends the factory knows how to build.

use crate::error::DispatchResult;
use crate::providers::error::ProviderResult;
use crate::providers::pricing::{estimate_with, ModelPrice, PricingUnit};
use crate::providers::settings::{CallOverrides, ProviderSettings};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Core trait that all LLM provider adapters implement
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Display name used in logs and error messages (e.g. "OpenAI")
    fn name(&self) -> &str;

    /// The settings bag this adapter was built from
    fn settings(&self) -> &ProviderSettings;

    /// Send one completion request and return the best completion text
    async fn call(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        overrides: &CallOverrides,
    ) -> ProviderResult<String>;

    /// Configured model, vendor and approximate pricing
    fn model_info(&self) -> ModelInfo;

    /// Estimated USD cost for a token count (70/30 input/output split)
    fn estimate_cost(&self, tokens: u64) -> f64 {
        let info = self.model_info();
        info.pricing
            .map(|price| estimate_with(price, info.pricing_unit, tokens))
            .unwrap_or(0.0)
    }
}

/// Model metadata reported by an adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Configured model identifier
    pub name: String,

    /// Vendor behind the API (e.g. "Anthropic" for Claude)
    pub provider: String,

    /// Price for the configured model, or the provider's default tier
    pub pricing: Option<ModelPrice>,

    /// Token quantity `pricing` is quoted for
    pub pricing_unit: PricingUnit,

    pub max_tokens: u32,

    pub temperature: f32,
}

/// Supported provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    OpenAI,
    Claude,
    Gemini,
}

impl ProviderType {
    /// Every registered provider type, in registration order
    pub const ALL: [ProviderType; 3] = [ProviderType::OpenAI, ProviderType::Claude, ProviderType::Gemini];

    /// Configuration name of this provider type
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "openai",
            ProviderType::Claude => "claude",
            ProviderType::Gemini => "gemini",
        }
    }

    /// Display name used to tag errors and logs
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "OpenAI",
            ProviderType::Claude => "Claude",
            ProviderType::Gemini => "Gemini",
        }
    }

    /// Create an adapter instance for this type
    pub fn create_adapter(&self, settings: &ProviderSettings) -> DispatchResult<Arc<dyn ProviderAdapter>> {
        Ok(match self {
            ProviderType::OpenAI => Arc::new(crate::providers::OpenAIAdapter::new(settings)?),
            ProviderType::Claude => Arc::new(crate::providers::ClaudeAdapter::new(settings)?),
            ProviderType::Gemini => Arc::new(crate::providers::GeminiAdapter::new(settings)?),
        })
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderType::ALL
            .into_iter()
            .find(|provider_type| provider_type.as_str() == s)
            .ok_or(())
    }
}
