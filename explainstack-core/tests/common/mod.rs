//! Shared test doubles for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use explainstack_core::providers::{
    AdapterFactory, CallOverrides, ModelInfo, ModelPrice, PricingUnit, ProviderAdapter,
    ProviderError, ProviderResult, ProviderSettings,
};
use explainstack_core::{DispatchConfig, DispatchResult, ProviderFactory};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Adapter that answers with "<model>: <reply>" or a fixed error
pub struct StubAdapter {
    settings: ProviderSettings,
    model: String,
    failure: Option<ProviderError>,
    calls: AtomicUsize,
}

impl StubAdapter {
    pub fn new(settings: &ProviderSettings, failure: Option<ProviderError>) -> Self {
        let model = settings
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or("stub-model")
            .to_string();
        Self {
            settings: settings.clone(),
            model,
            failure,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderAdapter for StubAdapter {
    fn name(&self) -> &str {
        "Stub"
    }

    fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    async fn call(&self, _system: &str, user: &str, _: &CallOverrides) -> ProviderResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(format!("{}: handled {} chars", self.model, user.chars().count())),
        }
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            name: self.model.clone(),
            provider: "Stub".to_string(),
            pricing: Some(ModelPrice::new(0.03, 0.06)),
            pricing_unit: PricingUnit::PerThousand,
            max_tokens: 2000,
            temperature: 0.3,
        }
    }
}

/// Factory double that records every adapter it builds, by model name
#[derive(Default)]
pub struct CountingFactory {
    built: Mutex<Vec<String>>,
    failure: Option<ProviderError>,
}

impl CountingFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(failure: ProviderError) -> Arc<Self> {
        Arc::new(Self {
            built: Mutex::new(Vec::new()),
            failure: Some(failure),
        })
    }

    pub fn built(&self) -> Vec<String> {
        self.built.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.built.lock().unwrap().len()
    }
}

impl AdapterFactory for CountingFactory {
    fn create(
        &self,
        provider_type: &str,
        settings: &ProviderSettings,
    ) -> DispatchResult<Arc<dyn ProviderAdapter>> {
        // Type checking stays with the real factory
        ProviderFactory::new().parse_type(provider_type)?;

        let adapter = StubAdapter::new(settings, self.failure.clone());
        self.built.lock().unwrap().push(adapter.model.clone());
        Ok(Arc::new(adapter))
    }

    fn supported_types(&self) -> Vec<&'static str> {
        ProviderFactory::new().supported_types()
    }
}

/// Every built-in agent bound to a model named after the agent
pub fn config_per_agent_models() -> DispatchConfig {
    let ids = [
        ("code_expert", "openai"),
        ("patch_reviewer", "claude"),
        ("import_cleaner", "openai"),
        ("commit_writer", "openai"),
        ("security_expert", "gemini"),
        ("performance_expert", "gemini"),
    ];
    ids.into_iter().fold(DispatchConfig::new(), |config, (id, provider)| {
        config.with_agent(
            id,
            provider,
            ProviderSettings::new()
                .with("api_key", "test-key")
                .with("model", format!("{}-model", id)),
        )
    })
}
