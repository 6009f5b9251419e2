//! OpenAI provider implementation
//!
//! Chat Completions API: the system prompt travels as a `system` role message
//! ahead of the user message.

use crate::error::DispatchResult;
use crate::http::HttpClient;
use crate::providers::adapter::{ModelInfo, ProviderAdapter};
use crate::providers::error::{ProviderError, ProviderResult};
use crate::providers::pricing::{ModelPrice, PricingTable, PricingUnit};
use crate::providers::settings::{CallOverrides, EffectiveParams, ProviderSettings, ResolvedSettings};
use crate::providers::{build_http_client, check_prompts, credential_headers, log_failure};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Public API endpoint
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const DISPLAY_NAME: &str = "OpenAI";

/// Per 1K tokens, approximate
pub const OPENAI_PRICING: PricingTable = PricingTable {
    unit: PricingUnit::PerThousand,
    models: &[
        ("gpt-4", ModelPrice::new(0.03, 0.06)),
        ("gpt-4-turbo", ModelPrice::new(0.01, 0.03)),
        ("gpt-3.5-turbo", ModelPrice::new(0.001, 0.002)),
        ("gpt-3.5-turbo-16k", ModelPrice::new(0.003, 0.004)),
    ],
    fallback: Some(ModelPrice::new(0.001, 0.002)),
};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI adapter
pub struct OpenAIAdapter {
    settings: ResolvedSettings,
    http: HttpClient,
}

impl OpenAIAdapter {
    /// Create a new OpenAI adapter from a settings bag
    pub fn new(settings: &ProviderSettings) -> DispatchResult<Self> {
        let settings = ResolvedSettings::resolve(DISPLAY_NAME, settings, OPENAI_BASE_URL)?;
        let http = build_http_client(DISPLAY_NAME)?;
        info!("OpenAI backend initialized with model: {}", settings.model);
        Ok(Self { settings, http })
    }

    fn request_body(&self, system_prompt: &str, user_prompt: &str, params: &EffectiveParams) -> ProviderResult<Value> {
        let request = ChatCompletionRequest {
            model: &params.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };
        serde_json::to_value(&request)
            .map_err(|e| ProviderError::unknown(DISPLAY_NAME, format!("Failed to serialize request: {}", e)))
    }

    fn extract_completion(body: Value) -> ProviderResult<String> {
        let response: ChatCompletionResponse = serde_json::from_value(body)
            .map_err(|e| ProviderError::unknown(DISPLAY_NAME, format!("Invalid response format: {}", e)))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::unknown(DISPLAY_NAME, "response contained no completion"))
    }
}

#[async_trait]
impl ProviderAdapter for OpenAIAdapter {
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
        info!("Generating response with OpenAI");

        let params = self.settings.effective(overrides);
        let body = self.request_body(system_prompt, user_prompt, &params)?;
        let headers = credential_headers(
            DISPLAY_NAME,
            "authorization",
            &format!("Bearer {}", self.settings.api_key.expose_secret()),
        )?;
        let url = format!("{}/chat/completions", self.settings.base_url);

        let result = self
            .http
            .post_json(DISPLAY_NAME, &url, headers, &body)
            .await
            .map_err(|kind| ProviderError::new(DISPLAY_NAME, kind))
            .and_then(Self::extract_completion);

        match &result {
            Ok(_) => info!("OpenAI response generated successfully"),
            Err(err) => log_failure(err),
        }
        result
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            name: self.settings.model.clone(),
            provider: "OpenAI".to_string(),
            pricing: OPENAI_PRICING.price_for(&self.settings.model),
            pricing_unit: OPENAI_PRICING.unit,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(model: &str) -> OpenAIAdapter {
        let settings = ProviderSettings::new()
            .with("api_key", "sk-test")
            .with("model", model);
        OpenAIAdapter::new(&settings).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let adapter = adapter("gpt-4");
        let params = adapter.settings.effective(&CallOverrides::default().with_max_tokens(50));
        let body = adapter.request_body("be terse", "hello", &params).unwrap();

        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be terse");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["max_tokens"], 50);
    }

    #[test]
    fn test_extract_completion() {
        let body = serde_json::json!({
            "id": "chatcmpl-123",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hi there"}}]
        });
        assert_eq!(OpenAIAdapter::extract_completion(body).unwrap(), "Hi there");

        let empty = serde_json::json!({"choices": []});
        assert!(OpenAIAdapter::extract_completion(empty).is_err());
    }

    #[test]
    fn test_estimate_cost_for_gpt4() {
        let cost = adapter("gpt-4").estimate_cost(1000);
        assert!((cost - 0.039).abs() < 1e-9);
    }

    #[test]
    fn test_model_info_falls_back_for_unknown_model() {
        let info = adapter("gpt-4o-mini").model_info();
        assert_eq!(info.provider, "OpenAI");
        assert_eq!(info.pricing, Some(ModelPrice::new(0.001, 0.002)));
    }
}
