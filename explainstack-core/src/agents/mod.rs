//! Agents
//!
//! An agent pairs a compiled-in prompt template ([`AgentDefinition`]) with one
//! bound provider adapter. Agents are the boundary where provider failures and
//! unexpected panics become an [`Outcome`].

mod prompts;

use crate::outcome::Outcome;
use crate::providers::{CallOverrides, ModelInfo, ProviderAdapter};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info};

/// The closed set of built-in agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    CodeExpert,
    PatchReviewer,
    ImportCleaner,
    CommitWriter,
    SecurityExpert,
    PerformanceExpert,
}

impl AgentKind {
    pub const ALL: [AgentKind; 6] = [
        AgentKind::CodeExpert,
        AgentKind::PatchReviewer,
        AgentKind::ImportCleaner,
        AgentKind::CommitWriter,
        AgentKind::SecurityExpert,
        AgentKind::PerformanceExpert,
    ];

    /// Configuration identifier (e.g. `patch_reviewer`)
    pub fn id(&self) -> &'static str {
        match self {
            AgentKind::CodeExpert => "code_expert",
            AgentKind::PatchReviewer => "patch_reviewer",
            AgentKind::ImportCleaner => "import_cleaner",
            AgentKind::CommitWriter => "commit_writer",
            AgentKind::SecurityExpert => "security_expert",
            AgentKind::PerformanceExpert => "performance_expert",
        }
    }

    pub fn from_id(id: &str) -> Option<AgentKind> {
        AgentKind::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Compiled-in definition for this agent
    pub fn definition(&self) -> &'static AgentDefinition {
        match self {
            AgentKind::CodeExpert => &DEFINITIONS[0],
            AgentKind::PatchReviewer => &DEFINITIONS[1],
            AgentKind::ImportCleaner => &DEFINITIONS[2],
            AgentKind::CommitWriter => &DEFINITIONS[3],
            AgentKind::SecurityExpert => &DEFINITIONS[4],
            AgentKind::PerformanceExpert => &DEFINITIONS[5],
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AgentKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentKind::from_id(s).ok_or(())
    }
}

/// Static description of an agent: display data plus its prompt pair
pub struct AgentDefinition {
    pub kind: AgentKind,
    pub name: &'static str,
    pub description: &'static str,
    pub system_prompt: fn() -> String,
    pub render_user_prompt: fn(&str) -> String,
}

impl fmt::Debug for AgentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentDefinition")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

static DEFINITIONS: [AgentDefinition; 6] = [
    AgentDefinition {
        kind: AgentKind::CodeExpert,
        name: "Code Expert",
        description: "Explains Python code, especially OpenStack projects",
        system_prompt: prompts::code_expert_system,
        render_user_prompt: prompts::code_expert_user,
    },
    AgentDefinition {
        kind: AgentKind::PatchReviewer,
        name: "Patch Reviewer",
        description: "Reviews Gerrit patches and OpenStack code changes",
        system_prompt: prompts::patch_reviewer_system,
        render_user_prompt: prompts::patch_reviewer_user,
    },
    AgentDefinition {
        kind: AgentKind::ImportCleaner,
        name: "Import Cleaner",
        description: "Organizes Python imports according to OpenStack standards",
        system_prompt: prompts::import_cleaner_system,
        render_user_prompt: prompts::import_cleaner_user,
    },
    AgentDefinition {
        kind: AgentKind::CommitWriter,
        name: "Commit Writer",
        description: "Writes commit messages for OpenStack changes",
        system_prompt: prompts::commit_writer_system,
        render_user_prompt: prompts::commit_writer_user,
    },
    AgentDefinition {
        kind: AgentKind::SecurityExpert,
        name: "Security Expert",
        description: "Security analysis and vulnerability detection",
        system_prompt: prompts::security_expert_system,
        render_user_prompt: prompts::security_expert_user,
    },
    AgentDefinition {
        kind: AgentKind::PerformanceExpert,
        name: "Performance Expert",
        description: "Performance analysis and code optimization",
        system_prompt: prompts::performance_expert_system,
        render_user_prompt: prompts::performance_expert_user,
    },
];

/// Display information reported by a realized agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub name: String,
    pub description: String,
    pub id: String,
}

/// Selection-list entry, built from definitions alone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<&AgentDefinition> for AgentSummary {
    fn from(definition: &AgentDefinition) -> Self {
        Self {
            id: definition.kind.id().to_string(),
            name: definition.name.to_string(),
            description: definition.description.to_string(),
        }
    }
}

/// A definition bound to a provider adapter
pub struct Agent {
    definition: &'static AgentDefinition,
    adapter: Arc<dyn ProviderAdapter>,
}

impl Agent {
    pub fn new(definition: &'static AgentDefinition, adapter: Arc<dyn ProviderAdapter>) -> Self {
        Self { definition, adapter }
    }

    pub fn kind(&self) -> AgentKind {
        self.definition.kind
    }

    pub fn name(&self) -> &'static str {
        self.definition.name
    }

    pub fn description(&self) -> &'static str {
        self.definition.description
    }

    pub fn definition(&self) -> &'static AgentDefinition {
        self.definition
    }

    /// Render both prompts for `input` and run them through the bound adapter
    ///
    /// Never fails: provider errors and panics raised while producing the
    /// completion are reported as [`Outcome::Failed`].
    pub async fn process(&self, input: &str) -> Outcome {
        info!(
            "Processing with {} agent using {} backend",
            self.name(),
            self.adapter.name()
        );

        let work = async {
            let system_prompt = (self.definition.system_prompt)();
            let user_prompt = (self.definition.render_user_prompt)(input);
            self.adapter
                .call(&system_prompt, &user_prompt, &CallOverrides::default())
                .await
        };

        match AssertUnwindSafe(work).catch_unwind().await {
            Ok(Ok(text)) => {
                info!("{} agent processed successfully", self.name());
                Outcome::completed(text)
            }
            Ok(Err(err)) => {
                error!("{} agent failed: {}", self.name(), err);
                Outcome::failed(err.to_string())
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!("Unexpected error in {}: {}", self.name(), message);
                Outcome::failed(format!("Unexpected error in {}: {}", self.name(), message))
            }
        }
    }

    pub fn info(&self) -> AgentInfo {
        AgentInfo {
            name: self.name().to_string(),
            description: self.description().to_string(),
            id: self.name().to_lowercase().replace(' ', "_"),
        }
    }

    /// Display name of the bound provider
    pub fn provider_name(&self) -> &str {
        self.adapter.name()
    }

    pub fn model_info(&self) -> ModelInfo {
        self.adapter.model_info()
    }

    pub fn estimate_cost(&self, tokens: u64) -> f64 {
        self.adapter.estimate_cost(tokens)
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("kind", &self.definition.kind)
            .field("provider", &self.adapter.name())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
