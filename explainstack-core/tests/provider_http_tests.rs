//! Provider adapters against a mocked HTTP backend

use explainstack_core::providers::{
    CallOverrides, ClaudeAdapter, GeminiAdapter, OpenAIAdapter, ProviderAdapter, ProviderErrorKind,
    ProviderSettings,
};
use explainstack_core::{AgentRegistry, DispatchConfig, ProviderFactory, AdapterFactory, Router};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer, model: &str) -> ProviderSettings {
    ProviderSettings::new()
        .with("api_key", "test-key")
        .with("model", model)
        .with("base_url", server.uri())
}

fn build(provider_type: &str, settings: &ProviderSettings) -> Arc<dyn ProviderAdapter> {
    ProviderFactory::new().create(provider_type, settings).unwrap()
}

#[tokio::test]
async fn test_openai_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4",
            "messages": [
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "hi"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "hello"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = OpenAIAdapter::new(&settings(&server, "gpt-4")).unwrap();
    let text = adapter
        .call("be brief", "hi", &CallOverrides::default())
        .await
        .unwrap();
    assert_eq!(text, "hello");
}

#[tokio::test]
async fn test_claude_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({"system": "review", "max_tokens": 100})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "message",
            "content": [{"type": "text", "text": "LGTM"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = ClaudeAdapter::new(&settings(&server, "claude-3-haiku-20240307")).unwrap();
    let text = adapter
        .call("review", "diff", &CallOverrides::default().with_max_tokens(100))
        .await
        .unwrap();
    assert_eq!(text, "LGTM");
}

#[tokio::test]
async fn test_gemini_success_uses_model_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "fast "}, {"text": "answer"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = GeminiAdapter::new(&settings(&server, "gemini-pro")).unwrap();
    let text = adapter
        .call("sys", "usr", &CallOverrides::default().with_model("gemini-1.5-flash"))
        .await
        .unwrap();
    assert_eq!(text, "fast answer");
}

async fn rate_limited_server(route: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "slow down"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_rate_limit_from_every_provider() {
    let cases = [
        ("openai", "OpenAI", "/chat/completions", "gpt-4"),
        ("claude", "Claude", "/messages", "claude-3-opus-20240229"),
        ("gemini", "Gemini", "/models/gemini-pro:generateContent", "gemini-pro"),
    ];

    for (provider_type, display, route, model) in cases {
        let server = rate_limited_server(route).await;
        let adapter = build(provider_type, &settings(&server, model));

        let err = adapter
            .call("sys", "usr", &CallOverrides::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::RateLimited);
        let message = err.to_string();
        assert!(message.contains(display), "{}", message);
        assert!(message.contains("try again in a few minutes"), "{}", message);
    }
}

#[tokio::test]
async fn test_authentication_failure_through_router() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": {"type": "authentication_error", "message": "invalid x-api-key"}
        })))
        .mount(&server)
        .await;

    let config = DispatchConfig::new().with_agent(
        "patch_reviewer",
        "claude",
        settings(&server, "claude-3-sonnet-20240229"),
    );
    let router = Router::new(Arc::new(AgentRegistry::new(config)));

    let outcome = router
        .route("diff --git a/x b/x", None)
        .await
        .unwrap();
    let error = outcome.error().unwrap();
    assert!(error.contains("authentication"), "{}", error);
    assert!(error.contains("Claude"), "{}", error);
    assert!(outcome.text().is_none());
}

#[tokio::test]
async fn test_openai_missing_key_is_authentication_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "You didn't provide an API key.",
                "type": "invalid_request_error",
                "param": null,
                "code": null
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let bag = ProviderSettings::new()
        .with("api_key", "")
        .with("model", "gpt-4")
        .with("base_url", server.uri());
    let adapter = build("openai", &bag);
    let err = adapter
        .call("s", "u", &CallOverrides::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::AuthenticationFailed);
    assert_eq!(
        err.to_string(),
        "OpenAI authentication error. Please check your API key."
    );
}

#[tokio::test]
async fn test_error_body_type_refines_server_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_json(json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        })))
        .mount(&server)
        .await;

    let adapter = build("claude", &settings(&server, "claude-3-sonnet-20240229"));
    let err = adapter
        .call("s", "u", &CallOverrides::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::RateLimited);
}

#[tokio::test]
async fn test_gemini_invalid_key_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .mount(&server)
        .await;

    let adapter = build("gemini", &settings(&server, "gemini-pro"));
    let err = adapter
        .call("s", "u", &CallOverrides::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Gemini authentication error. Please check your API key."
    );
}

#[tokio::test]
async fn test_server_error_is_unknown_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"message": "The server had an error", "type": "server_error"}
        })))
        .mount(&server)
        .await;

    let adapter = build("openai", &settings(&server, "gpt-4"));
    let err = adapter
        .call("s", "u", &CallOverrides::default())
        .await
        .unwrap_err();
    assert!(matches!(err.kind, ProviderErrorKind::Unknown(_)));
    let message = err.to_string();
    assert!(message.starts_with("OpenAI unexpected error:"), "{}", message);
    assert!(message.contains("The server had an error"), "{}", message);
}

#[tokio::test]
async fn test_unreachable_host_is_connection_error() {
    let bag = ProviderSettings::new()
        .with("api_key", "k")
        .with("model", "gpt-4")
        .with("base_url", "http://127.0.0.1:1/v1");
    let adapter = build("openai", &bag);

    let err = adapter
        .call("s", "u", &CallOverrides::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "OpenAI API connection error. Please check your internet connection."
    );
}

#[tokio::test]
async fn test_empty_prompt_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let adapter = build("openai", &settings(&server, "gpt-4"));
    let err = adapter
        .call("system", "   ", &CallOverrides::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);
}

#[tokio::test]
async fn test_adapters_keep_their_own_settings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"model": "gpt-4"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "from gpt-4"}}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"model": "gpt-3.5-turbo"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "from gpt-3.5"}}]
        })))
        .mount(&server)
        .await;

    let first = build("openai", &settings(&server, "gpt-4"));
    let second = build("openai", &settings(&server, "gpt-3.5-turbo"));

    let overrides = CallOverrides::default();
    assert_eq!(second.call("s", "u", &overrides).await.unwrap(), "from gpt-3.5");
    assert_eq!(first.call("s", "u", &overrides).await.unwrap(), "from gpt-4");
    assert_eq!(first.model_info().name, "gpt-4");
    assert_eq!(first.settings().get("model"), Some(&json!("gpt-4")));
}

#[test]
fn test_cost_estimate_for_gpt4() {
    let bag = ProviderSettings::new().with("api_key", "k").with("model", "gpt-4");
    let adapter = build("openai", &bag);
    assert!((adapter.estimate_cost(1000) - 0.039).abs() < 1e-9);
}
