//! ExplainStack Core Library
//!
//! Agent routing and multi-provider LLM dispatch. A [`router::Router`] picks an
//! agent for a piece of user text (explicitly or by classification), the agent
//! renders its prompts and hands them to whichever provider adapter the
//! configuration bound to it, and every layer reports back through the same
//! [`Outcome`] shape.

pub mod agents;
pub mod config;
pub mod error;
pub mod http;
pub mod outcome;
pub mod providers;
pub mod registry;
pub mod router;

pub use agents::{Agent, AgentDefinition, AgentInfo, AgentKind, AgentSummary};
pub use config::{ConfigError, ConfigValidator, DispatchConfig, InputLimits, UserCredentials};
pub use error::{DispatchError, DispatchResult};
pub use outcome::Outcome;
pub use providers::{
    AdapterFactory, CallOverrides, ProviderAdapter, ProviderError, ProviderErrorKind,
    ProviderFactory, ProviderSettings, ProviderType,
};
pub use registry::{AgentRegistry, Classifier};
pub use router::{validate_input, Dispatch, InputError, Router};

/// Returns the version of the ExplainStack Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
