//! Claude provider implementation
//!
//! Anthropic Messages API. The system prompt goes in the top-level `system`
//! field; the conversation is a single user turn.

use crate::error::DispatchResult;
use crate::http::HttpClient;
use crate::providers::adapter::{ModelInfo, ProviderAdapter};
use crate::providers::error::{ProviderError, ProviderResult};
use crate::providers::pricing::{ModelPrice, PricingTable, PricingUnit};
use crate::providers::settings::{CallOverrides, EffectiveParams, ProviderSettings, ResolvedSettings};
use crate::providers::{build_http_client, check_prompts, credential_headers, log_failure};
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Public API endpoint
pub const CLAUDE_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Messages API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const DISPLAY_NAME: &str = "Claude";

/// Per 1K tokens, approximate
pub const CLAUDE_PRICING: PricingTable = PricingTable {
    unit: PricingUnit::PerThousand,
    models: &[
        ("claude-3-opus-20240229", ModelPrice::new(0.015, 0.075)),
        ("claude-3-sonnet-20240229", ModelPrice::new(0.003, 0.015)),
        ("claude-3-haiku-20240307", ModelPrice::new(0.00025, 0.00125)),
    ],
    fallback: Some(ModelPrice::new(0.003, 0.015)),
};

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [UserTurn<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

/// Claude (Anthropic) adapter
pub struct ClaudeAdapter {
    settings: ResolvedSettings,
    http: HttpClient,
}

impl ClaudeAdapter {
    /// Create a new Claude adapter from a settings bag
    pub fn new(settings: &ProviderSettings) -> DispatchResult<Self> {
        let settings = ResolvedSettings::resolve(DISPLAY_NAME, settings, CLAUDE_BASE_URL)?;
        let http = build_http_client(DISPLAY_NAME)?;
        info!("Claude backend initialized with model: {}", settings.model);
        Ok(Self { settings, http })
    }

    fn request_body(&self, system_prompt: &str, user_prompt: &str, params: &EffectiveParams) -> ProviderResult<Value> {
        let request = MessagesRequest {
            model: &params.model,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            system: system_prompt,
            messages: [UserTurn {
                role: "user",
                content: user_prompt,
            }],
        };
        serde_json::to_value(&request)
            .map_err(|e| ProviderError::unknown(DISPLAY_NAME, format!("Failed to serialize request: {}", e)))
    }

    fn extract_completion(body: Value) -> ProviderResult<String> {
        let response: MessagesResponse = serde_json::from_value(body)
            .map_err(|e| ProviderError::unknown(DISPLAY_NAME, format!("Invalid response format: {}", e)))?;

        let text: Vec<String> = response
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect();

        if text.is_empty() {
            return Err(ProviderError::unknown(DISPLAY_NAME, "response contained no completion"));
        }
        Ok(text.concat())
    }
}

#[async_trait]
impl ProviderAdapter for ClaudeAdapter {
    fn name(&self) -> &str {
        DISPLAY_NAME
    }

    fn settings(&self) -> &ProviderSettings {
        self.settings.raw()
    }

    async fn call(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        overrides: &CallOverrides,
    ) -> ProviderResult<String> {
        check_prompts(DISPLAY_NAME, system_prompt, user_prompt)?;
        info!("Generating response with Claude");

        let params = self.settings.effective(overrides);
        let body = self.request_body(system_prompt, user_prompt, &params)?;
        let mut headers =
            credential_headers(DISPLAY_NAME, "x-api-key", self.settings.api_key.expose_secret())?;
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        let url = format!("{}/messages", self.settings.base_url);

        let result = self
            .http
            .post_json(DISPLAY_NAME, &url, headers, &body)
            .await
            .map_err(|kind| ProviderError::new(DISPLAY_NAME, kind))
            .and_then(Self::extract_completion);

        match &result {
            Ok(_) => info!("Claude response generated successfully"),
            Err(err) => log_failure(err),
        }
        result
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            name: self.settings.model.clone(),
            provider: "Anthropic".to_string(),
            pricing: CLAUDE_PRICING.price_for(&self.settings.model),
            pricing_unit: CLAUDE_PRICING.unit,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }
}
