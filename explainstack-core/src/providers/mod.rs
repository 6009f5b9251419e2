//! Provider abstraction layer
//!
//! Wraps each supported LLM API behind [`ProviderAdapter`] and normalizes its
//! successes and failures, so agents can run against any backend unchanged.

pub mod adapter;
pub mod claude;
pub mod error;
pub mod factory;
pub mod gemini;
pub mod openai;
pub mod pricing;
pub mod settings;

pub use adapter::{ModelInfo, ProviderAdapter, ProviderType};
pub use error::{ProviderError, ProviderErrorKind, ProviderResult};
pub use factory::{AdapterFactory, BackendInfo, ProviderFactory};
pub use pricing::{ModelPrice, PricingTable, PricingUnit};
pub use settings::{CallOverrides, ProviderSettings};

// Re-export concrete adapters
pub use claude::ClaudeAdapter;
pub use gemini::GeminiAdapter;
pub use openai::OpenAIAdapter;

use crate::error::{DispatchError, DispatchResult};
use crate::http::HttpClient;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{error, warn};

/// Build the HTTP client an adapter will own
pub(crate) fn build_http_client(provider: &str) -> DispatchResult<HttpClient> {
    HttpClient::new().map_err(|e| DispatchError::HttpClient {
        provider: provider.to_string(),
        message: e.to_string(),
    })
}

/// Reject empty prompts before anything goes on the wire
pub(crate) fn check_prompts(provider: &str, system_prompt: &str, user_prompt: &str) -> ProviderResult<()> {
    if system_prompt.trim().is_empty() || user_prompt.trim().is_empty() {
        warn!("{} call rejected: empty prompt", provider);
        return Err(ProviderError::invalid_request(provider));
    }
    Ok(())
}

/// Header map with a single credential header marked sensitive
pub(crate) fn credential_headers(
    provider: &str,
    name: &'static str,
    value: &str,
) -> ProviderResult<HeaderMap> {
    let mut value =
        HeaderValue::from_str(value).map_err(|_| ProviderError::authentication(provider))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static(name), value);
    Ok(headers)
}

/// Log a mapped failure at the level its category deserves
pub(crate) fn log_failure(err: &ProviderError) {
    match err.kind {
        ProviderErrorKind::RateLimited | ProviderErrorKind::InvalidRequest => {
            warn!("{} {} error: {}", err.provider, err.kind.label(), err)
        }
        _ => error!("{} {} error: {}", err.provider, err.kind.label(), err),
    }
}
