//! Agent registry
//!
//! Owns one [`DispatchConfig`] and realizes agents from it on demand. An agent
//! is built the first time its id is requested and cached for the lifetime of
//! the registry; ids never requested never touch the factory. A changed
//! configuration means a new registry.

mod classifier;

pub use classifier::Classifier;

use crate::agents::{Agent, AgentInfo, AgentKind, AgentSummary};
use crate::config::DispatchConfig;
use crate::error::DispatchResult;
use crate::providers::{AdapterFactory, ProviderFactory};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

pub struct AgentRegistry {
    config: DispatchConfig,
    factory: Arc<dyn AdapterFactory>,
    classifier: Classifier,
    agents: RwLock<HashMap<String, Arc<Agent>>>,
}

impl AgentRegistry {
    /// Registry backed by the stock [`ProviderFactory`]
    pub fn new(config: DispatchConfig) -> Self {
        Self::with_factory(config, Arc::new(ProviderFactory::new()))
    }

    pub fn with_factory(config: DispatchConfig, factory: Arc<dyn AdapterFactory>) -> Self {
        Self {
            config,
            factory,
            classifier: Classifier::new(),
            agents: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Ids with both a built-in definition and a configured binding, in
    /// definition order
    pub fn recognized(&self) -> impl Iterator<Item = AgentKind> + '_ {
        AgentKind::ALL
            .into_iter()
            .filter(move |kind| self.config.agents.contains_key(kind.id()))
    }

    /// Fetch an agent, building it on first access
    ///
    /// `Ok(None)` for an unrecognized id. Construction errors (unsupported
    /// provider type, missing settings) are returned and nothing is cached.
    pub fn get_agent(&self, id: &str) -> DispatchResult<Option<Arc<Agent>>> {
        let Some(kind) = AgentKind::from_id(id) else {
            debug!("No agent definition for '{}'", id);
            return Ok(None);
        };
        let Some(binding) = self.config.binding(id) else {
            debug!("No provider binding for agent '{}'", id);
            return Ok(None);
        };

        if let Some(agent) = self.cached(id) {
            debug!("Agent cache hit: {}", id);
            return Ok(Some(agent));
        }

        debug!("Agent cache miss: {}", id);
        // Built outside the lock; concurrent first requests may each build one
        let adapter = self
            .factory
            .create(&binding.provider_type, &binding.provider_settings)?;
        let built = Arc::new(Agent::new(kind.definition(), adapter));

        let mut agents = self.agents.write().unwrap_or_else(PoisonError::into_inner);
        let agent = agents.entry(id.to_string()).or_insert(built).clone();
        info!(
            "Agent {} ready on {} backend",
            agent.name(),
            agent.provider_name()
        );
        Ok(Some(agent))
    }

    /// Info for every recognized agent, realizing each of them
    pub fn all_agents(&self) -> DispatchResult<BTreeMap<String, AgentInfo>> {
        let mut all = BTreeMap::new();
        for kind in self.recognized() {
            if let Some(agent) = self.get_agent(kind.id())? {
                all.insert(kind.id().to_string(), agent.info());
            }
        }
        Ok(all)
    }

    /// Selection list of recognized agents, without realizing any
    pub fn agent_list(&self) -> Vec<AgentSummary> {
        self.recognized()
            .map(|kind| AgentSummary::from(kind.definition()))
            .collect()
    }

    pub fn classify(&self, input: &str) -> AgentKind {
        self.classifier.classify(input)
    }

    /// Number of agents realized so far
    pub fn realized_count(&self) -> usize {
        self.agents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn cached(&self, id: &str) -> Option<Arc<Agent>> {
        self.agents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("bindings", &self.config.agents.len())
            .field("realized", &self.realized_count())
            .finish()
    }
}
