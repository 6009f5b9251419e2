//! Gemini provider implementation
//!
//! Google Generative Language API (`generateContent`). The system prompt is
//! sent as `systemInstruction`; prices are quoted per million tokens.

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
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const DISPLAY_NAME: &str = "Gemini";

/// Per 1M tokens, approximate
pub const GEMINI_PRICING: PricingTable = PricingTable {
    unit: PricingUnit::PerMillion,
    models: &[
        ("gemini-pro", ModelPrice::new(0.5, 1.5)),
        ("gemini-pro-vision", ModelPrice::new(0.5, 1.5)),
        ("gemini-1.5-pro", ModelPrice::new(1.25, 5.0)),
        ("gemini-1.5-flash", ModelPrice::new(0.075, 0.3)),
    ],
    fallback: Some(ModelPrice::new(0.5, 1.5)),
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Gemini (Google) adapter
pub struct GeminiAdapter {
    settings: ResolvedSettings,
    http: HttpClient,
}

impl GeminiAdapter {
    /// Create a new Gemini adapter from a settings bag
    pub fn new(settings: &ProviderSettings) -> DispatchResult<Self> {
        let settings = ResolvedSettings::resolve(DISPLAY_NAME, settings, GEMINI_BASE_URL)?;
        let http = build_http_client(DISPLAY_NAME)?;
        info!("Gemini backend initialized with model: {}", settings.model);
        Ok(Self { settings, http })
    }

    fn request_body(&self, system_prompt: &str, user_prompt: &str, params: &EffectiveParams) -> ProviderResult<Value> {
        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: [Part { text: system_prompt }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [Part { text: user_prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_tokens,
            },
        };
        serde_json::to_value(&request)
            .map_err(|e| ProviderError::unknown(DISPLAY_NAME, format!("Failed to serialize request: {}", e)))
    }

    fn extract_completion(body: Value) -> ProviderResult<String> {
        let response: GenerateContentResponse = serde_json::from_value(body)
            .map_err(|e| ProviderError::unknown(DISPLAY_NAME, format!("Invalid response format: {}", e)))?;

        // Only the first candidate counts; a blocked prompt has none
        let text: Vec<String> = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ProviderError::unknown(DISPLAY_NAME, "response contained no completion"));
        }
        Ok(text.concat())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
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
        info!("Generating response with Gemini");

        let params = self.settings.effective(overrides);
        let body = self.request_body(system_prompt, user_prompt, &params)?;
        let headers =
            credential_headers(DISPLAY_NAME, "x-goog-api-key", self.settings.api_key.expose_secret())?;
        let url = format!("{}/models/{}:generateContent", self.settings.base_url, params.model);

        let result = self
            .http
            .post_json(DISPLAY_NAME, &url, headers, &body)
            .await
            .map_err(|kind| ProviderError::new(DISPLAY_NAME, kind))
            .and_then(Self::extract_completion);

        match &result {
            Ok(_) => info!("Gemini response generated successfully"),
            Err(err) => log_failure(err),
        }
        result
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            name: self.settings.model.clone(),
            provider: "Google".to_string(),
            pricing: GEMINI_PRICING.price_for(&self.settings.model),
            pricing_unit: GEMINI_PRICING.unit,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }
}
