//! Integration tests for lazy agent realization and caching

mod common;

use common::{config_per_agent_models, CountingFactory};
use explainstack_core::providers::ProviderSettings;
use explainstack_core::{AgentRegistry, DispatchConfig, DispatchError};
use std::sync::Arc;

#[test]
fn test_no_adapters_built_at_creation() {
    let factory = CountingFactory::new();
    let _registry = AgentRegistry::with_factory(config_per_agent_models(), factory.clone());
    assert_eq!(factory.count(), 0);
}

#[test]
fn test_requesting_one_agent_builds_only_its_adapter() {
    let factory = CountingFactory::new();
    let registry = AgentRegistry::with_factory(config_per_agent_models(), factory.clone());

    let agent = registry.get_agent("commit_writer").unwrap().unwrap();
    assert_eq!(agent.name(), "Commit Writer");
    assert_eq!(factory.built(), vec!["commit_writer-model"]);

    // Asking again is served from the cache
    registry.get_agent("commit_writer").unwrap().unwrap();
    assert_eq!(factory.count(), 1);
}

#[test]
fn test_agent_list_does_not_realize() {
    let factory = CountingFactory::new();
    let registry = AgentRegistry::with_factory(config_per_agent_models(), factory.clone());

    let ids: Vec<String> = registry.agent_list().into_iter().map(|a| a.id).collect();
    assert_eq!(
        ids,
        vec![
            "code_expert",
            "patch_reviewer",
            "import_cleaner",
            "commit_writer",
            "security_expert",
            "performance_expert"
        ]
    );
    assert_eq!(factory.count(), 0);
}

#[test]
fn test_all_agents_realizes_each_once() {
    let factory = CountingFactory::new();
    let registry = AgentRegistry::with_factory(config_per_agent_models(), factory.clone());

    let all = registry.all_agents().unwrap();
    assert_eq!(all.len(), 6);
    assert_eq!(all["patch_reviewer"].id, "patch_reviewer");
    assert_eq!(factory.count(), 6);

    registry.all_agents().unwrap();
    assert_eq!(factory.count(), 6);
}

#[test]
fn test_bindings_without_definition_are_ignored() {
    let factory = CountingFactory::new();
    let config = config_per_agent_models().with_agent(
        "translator",
        "openai",
        ProviderSettings::new().with("api_key", "k").with("model", "m"),
    );
    let registry = AgentRegistry::with_factory(config, factory.clone());

    assert!(registry.get_agent("translator").unwrap().is_none());
    assert_eq!(registry.all_agents().unwrap().len(), 6);
    assert!(!factory.built().contains(&"m".to_string()));
}

#[test]
fn test_unsupported_provider_type_aborts_realization() {
    let factory = CountingFactory::new();
    let config = DispatchConfig::new().with_agent(
        "code_expert",
        "llama",
        ProviderSettings::new().with("api_key", "k").with("model", "m"),
    );
    let registry = AgentRegistry::with_factory(config, factory.clone());

    let err = registry.get_agent("code_expert").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unsupported backend type: llama. Available: openai, claude, gemini"
    );
    assert_eq!(factory.count(), 0);
    assert!(registry.all_agents().is_err());
}

#[test]
fn test_missing_settings_surface_from_real_factory() {
    let config = DispatchConfig::new().with_agent(
        "patch_reviewer",
        "claude",
        ProviderSettings::new().with("model", "claude-3-haiku-20240307"),
    );
    let registry = AgentRegistry::new(config);

    let err = registry.get_agent("patch_reviewer").unwrap_err();
    assert_eq!(
        err,
        DispatchError::MissingProviderSetting {
            provider: "Claude".to_string(),
            key: "api_key".to_string(),
        }
    );
}

#[test]
fn test_concurrent_first_access_converges() {
    let factory = CountingFactory::new();
    let registry = Arc::new(AgentRegistry::with_factory(
        config_per_agent_models(),
        factory.clone(),
    ));

    let agents: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                scope.spawn(move || registry.get_agent("security_expert").unwrap().unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // Racing builders may each create an adapter, but everyone sees one agent
    assert!(factory.count() >= 1);
    let first = &agents[0];
    assert!(agents.iter().all(|agent| Arc::ptr_eq(agent, first)));
    assert_eq!(registry.realized_count(), 1);
}

#[test]
fn test_separate_registries_do_not_share_agents() {
    let factory = CountingFactory::new();
    let first = AgentRegistry::with_factory(config_per_agent_models(), factory.clone());
    let second = AgentRegistry::with_factory(config_per_agent_models(), factory.clone());

    let a = first.get_agent("code_expert").unwrap().unwrap();
    let b = second.get_agent("code_expert").unwrap().unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(factory.count(), 2);
}
