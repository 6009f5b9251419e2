//! HTTP error mapping utilities
//!
//! Turns non-success responses and transport failures from any of the
//! supported providers into a [`ProviderErrorKind`].

use crate::providers::error::ProviderErrorKind;
use reqwest::StatusCode;
use serde_json::Value;

/// Error details extracted from a provider's error body
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetails {
    pub message: String,
    /// Provider error type, status or code string, when present
    pub error_type: Option<String>,
}

/// Map HTTP status code and response body to an error kind
///
/// Credential, throttling, not-found/too-large and timeout statuses decide the
/// kind on their own. A 400 or a server-side status is refined by the error
/// type in the body, falling back to the status when the type is unknown.
pub fn map_http_error(status: StatusCode, body: Option<&str>) -> ProviderErrorKind {
    let details = body
        .and_then(|b| serde_json::from_str::<Value>(b).ok())
        .and_then(|v| extract_error_details(&v));

    // Gemini reports a bad key as a 400 INVALID_ARGUMENT; only the message tells
    if details
        .as_ref()
        .is_some_and(|d| d.message.contains("API key not valid"))
    {
        return ProviderErrorKind::AuthenticationFailed;
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            return ProviderErrorKind::AuthenticationFailed
        }
        StatusCode::TOO_MANY_REQUESTS => return ProviderErrorKind::RateLimited,
        StatusCode::NOT_FOUND | StatusCode::PAYLOAD_TOO_LARGE | StatusCode::UNPROCESSABLE_ENTITY => {
            return ProviderErrorKind::InvalidRequest
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            return ProviderErrorKind::ConnectionFailed
        }
        _ => {}
    }

    if let Some(kind) = details
        .as_ref()
        .and_then(|d| d.error_type.as_deref())
        .and_then(classify_error_type)
    {
        return kind;
    }

    if status == StatusCode::BAD_REQUEST {
        return ProviderErrorKind::InvalidRequest;
    }

    let message = details
        .map(|d| d.message)
        .or_else(|| body.map(str::to_string).filter(|b| !b.trim().is_empty()))
        .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()));
    ProviderErrorKind::Unknown(format!("HTTP {}: {}", status.as_u16(), message))
}

/// Map a transport-level reqwest failure to an error kind
pub fn map_transport_error(err: &reqwest::Error) -> ProviderErrorKind {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        ProviderErrorKind::ConnectionFailed
    } else if err.is_decode() || err.is_body() {
        ProviderErrorKind::Unknown(format!("Failed to read response body: {}", err))
    } else {
        ProviderErrorKind::Unknown(err.to_string())
    }
}

/// Map a JSON decoding failure on a success response
pub fn map_decode_error(err: &serde_json::Error) -> ProviderErrorKind {
    ProviderErrorKind::Unknown(format!("Invalid response format: {}", err))
}

/// Classify a provider error type string, if it is one we recognize
fn classify_error_type(error_type: &str) -> Option<ProviderErrorKind> {
    match error_type {
        // OpenAI
        "rate_limit_exceeded" | "requests" | "tokens" => Some(ProviderErrorKind::RateLimited),
        "invalid_api_key" | "invalid_authentication" => Some(ProviderErrorKind::AuthenticationFailed),
        "invalid_request_error" | "model_not_found" | "context_length_exceeded" => {
            Some(ProviderErrorKind::InvalidRequest)
        }

        // Anthropic
        "rate_limit_error" | "overloaded_error" => Some(ProviderErrorKind::RateLimited),
        "authentication_error" | "permission_error" => Some(ProviderErrorKind::AuthenticationFailed),
        "not_found_error" | "request_too_large" => Some(ProviderErrorKind::InvalidRequest),

        // Gemini (google.rpc status names)
        "RESOURCE_EXHAUSTED" => Some(ProviderErrorKind::RateLimited),
        "UNAUTHENTICATED" | "PERMISSION_DENIED" => Some(ProviderErrorKind::AuthenticationFailed),
        "INVALID_ARGUMENT" | "FAILED_PRECONDITION" | "NOT_FOUND" | "OUT_OF_RANGE" => {
            Some(ProviderErrorKind::InvalidRequest)
        }
        "DEADLINE_EXCEEDED" | "UNAVAILABLE" => Some(ProviderErrorKind::ConnectionFailed),

        _ => None,
    }
}

/// Extract error details from a JSON error body
pub fn extract_error_details(json: &Value) -> Option<ErrorDetails> {
    // OpenAI:    { "error": { "message", "type", "code" } }
    // Anthropic: { "type": "error", "error": { "type", "message" } }
    // Gemini:    { "error": { "code": 429, "message", "status" } }
    if let Some(error) = json.get("error") {
        if let Some(message) = error.get("message").and_then(Value::as_str) {
            let error_type = ["code", "type", "status"]
                .iter()
                .filter_map(|field| error.get(*field).and_then(Value::as_str))
                .find(|candidate| is_known_error_type(candidate))
                .or_else(|| error.get("type").and_then(Value::as_str))
                .or_else(|| error.get("status").and_then(Value::as_str))
                .map(str::to_string);

            return Some(ErrorDetails {
                message: message.to_string(),
                error_type,
            });
        }

        if let Some(message) = error.as_str() {
            return Some(ErrorDetails {
                message: message.to_string(),
                error_type: None,
            });
        }
    }

    // Generic format: { "message": "..." }
    json.get("message")
        .and_then(Value::as_str)
        .map(|message| ErrorDetails {
            message: message.to_string(),
            error_type: None,
        })
}

fn is_known_error_type(candidate: &str) -> bool {
    classify_error_type(candidate).is_some()
}
