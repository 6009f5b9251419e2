//! Router
//!
//! Single entry point for front ends: resolves which agent handles a piece of
//! text (explicit choice or classification) and delegates to it.

use crate::agents::{AgentInfo, AgentKind, AgentSummary};
use crate::config::InputLimits;
use crate::error::DispatchResult;
use crate::outcome::Outcome;
use crate::registry::AgentRegistry;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

/// Result of one routed request, with the numbers callers feed to analytics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dispatch {
    pub agent_id: String,

    /// `None` when the agent could not be resolved
    pub agent_name: Option<String>,

    pub outcome: Outcome,

    pub elapsed: Duration,

    /// Rough token count of input plus completion (4 characters per token)
    pub approx_tokens: u64,

    /// Estimated USD cost of `approx_tokens` on the agent's provider
    pub estimated_cost: f64,
}

#[derive(Debug, Clone)]
pub struct Router {
    registry: Arc<AgentRegistry>,
}

impl Router {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    /// Route `input` to an agent and return its outcome
    ///
    /// An explicit id always wins over classification; an empty or blank id
    /// counts as no choice. An id that does not
    /// resolve is reported as a failed outcome; only configuration errors hit
    /// while realizing the agent come back as `Err`.
    pub async fn route(&self, input: &str, explicit_id: Option<&str>) -> DispatchResult<Outcome> {
        Ok(self.dispatch(input, explicit_id).await?.outcome)
    }

    /// Like [`Router::route`], prefixing successful explicit replies with the
    /// agent's name
    pub async fn route_labeled(&self, input: &str, explicit_id: Option<&str>) -> DispatchResult<Outcome> {
        let dispatch = self.dispatch(input, explicit_id).await?;
        Ok(match (explicit_choice(explicit_id), dispatch.agent_name) {
            (Some(_), Some(name)) => dispatch
                .outcome
                .map_text(|text| format!("🤖 **{}**\n\n{}", name, text)),
            _ => dispatch.outcome,
        })
    }

    /// Route and report timing, token and cost figures alongside the outcome
    pub async fn dispatch(&self, input: &str, explicit_id: Option<&str>) -> DispatchResult<Dispatch> {
        let started = Instant::now();
        let agent_id = match explicit_choice(explicit_id) {
            Some(id) => {
                info!("Routing to explicitly selected agent: {}", id);
                id.to_string()
            }
            None => {
                let kind = self.registry.classify(input);
                info!("Auto-selected agent: {}", kind);
                kind.id().to_string()
            }
        };

        let Some(agent) = self.registry.get_agent(&agent_id)? else {
            warn!("Agent '{}' not found", agent_id);
            return Ok(Dispatch {
                outcome: Outcome::failed(format!("Agent '{}' not found", agent_id)),
                agent_id,
                agent_name: None,
                elapsed: started.elapsed(),
                approx_tokens: 0,
                estimated_cost: 0.0,
            });
        };

        let outcome = agent.process(input).await;
        let approx_tokens = approx_tokens(input) + outcome.text().map(approx_tokens).unwrap_or(0);
        let elapsed = started.elapsed();
        info!(
            "Agent {} finished in {:?} (ok: {})",
            agent_id,
            elapsed,
            outcome.is_ok()
        );

        Ok(Dispatch {
            estimated_cost: agent.estimate_cost(approx_tokens),
            agent_name: Some(agent.name().to_string()),
            agent_id,
            outcome,
            elapsed,
            approx_tokens,
        })
    }

    /// Agent that classification would pick for `input`
    pub fn suggest(&self, input: &str) -> AgentKind {
        self.registry.classify(input)
    }

    pub fn available_agents(&self) -> DispatchResult<BTreeMap<String, AgentInfo>> {
        self.registry.all_agents()
    }

    pub fn agent_list(&self) -> Vec<AgentSummary> {
        self.registry.agent_list()
    }
}

/// A blank selection means no selection
fn explicit_choice(explicit_id: Option<&str>) -> Option<&str> {
    explicit_id.filter(|id| !id.trim().is_empty())
}

/// Ceiling of characters / 4
fn approx_tokens(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(4)
}

/// Rejections produced by [`validate_input`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Message cannot be empty")]
    Empty,

    #[error("Message is too short (min {min} characters)")]
    TooShort { min: usize },

    #[error("Message is too long (max {max} characters)")]
    TooLong { max: usize },
}

/// Check user input against length limits before routing it
pub fn validate_input(input: &str, limits: &InputLimits) -> Result<(), InputError> {
    if input.trim().is_empty() {
        return Err(InputError::Empty);
    }
    let length = input.chars().count();
    if length < limits.min_input_length {
        return Err(InputError::TooShort {
            min: limits.min_input_length,
        });
    }
    if length > limits.max_input_length {
        return Err(InputError::TooLong {
            max: limits.max_input_length,
        });
    }
    Ok(())
}
