//! HTTP client implementation using reqwest

use crate::http::error::{map_decode_error, map_http_error, map_transport_error};
use crate::providers::error::ProviderErrorKind;
use reqwest::header::HeaderMap;
use reqwest::{Client, ClientBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Maximum response size (10MB)
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;

/// Default user agent
const USER_AGENT: &str = concat!("explainstack/", env!("CARGO_PKG_VERSION"));

/// Thin JSON-over-HTTP client owned by each adapter
///
/// No request timeout is configured here; callers needing bounded latency
/// wrap the call themselves.
#[derive(Clone)]
pub struct HttpClient {
    /// The underlying reqwest client (internally reference counted)
    client: Client,

    /// Maximum response size to prevent OOM
    max_response_size: usize,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            max_response_size: MAX_RESPONSE_SIZE,
        })
    }

    /// POST a JSON body and return the decoded JSON response
    ///
    /// `provider` only labels log lines.
    pub async fn post_json(
        &self,
        provider: &str,
        url: &str,
        headers: HeaderMap,
        body: &Value,
    ) -> Result<Value, ProviderErrorKind> {
        let request_id = Uuid::new_v4();
        debug!("POST {} for {} [request_id: {}]", url, provider, request_id);

        let response = self
            .client
            .post(url)
            .headers(headers)
            .header("X-Request-ID", request_id.to_string())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(
                    "Transport error for {} [request_id: {}]: {}",
                    provider, request_id, e
                );
                map_transport_error(&e)
            })?;

        let status = response.status();
        debug!("Response status: {} [request_id: {}]", status, request_id);

        if !status.is_success() {
            let body = response.text().await.ok();
            warn!(
                "Request failed with status {} for {} [request_id: {}]",
                status, provider, request_id
            );
            return Err(map_http_error(status, body.as_deref()));
        }

        Self::validate_content_type(&response)?;
        self.check_content_length(&response)?;

        let text = response.text().await.map_err(|e| map_transport_error(&e))?;
        if text.len() > self.max_response_size {
            return Err(ProviderErrorKind::Unknown(format!(
                "Response size {} exceeds maximum {}",
                text.len(),
                self.max_response_size
            )));
        }

        serde_json::from_str(&text).map_err(|e| map_decode_error(&e))
    }

    /// Validate response content type
    fn validate_content_type(response: &Response) -> Result<(), ProviderErrorKind> {
        if let Some(content_type) = response.headers().get("content-type") {
            let content_type = content_type.to_str().unwrap_or("").to_lowercase();
            if !content_type.contains("application/json") {
                return Err(ProviderErrorKind::Unknown(format!(
                    "Expected application/json, got: {}",
                    content_type
                )));
            }
        }
        Ok(())
    }

    /// Check declared response size before reading the body
    fn check_content_length(&self, response: &Response) -> Result<(), ProviderErrorKind> {
        match response.content_length() {
            Some(length) if length as usize > self.max_response_size => {
                Err(ProviderErrorKind::Unknown(format!(
                    "Response size {} exceeds maximum {}",
                    length, self.max_response_size
                )))
            }
            _ => Ok(()),
        }
    }
}
