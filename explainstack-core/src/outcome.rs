//! Uniform request outcome
//!
//! Every layer of the dispatch path (adapter, agent, router) reports back to
//! its caller through [`Outcome`]. A completed outcome always carries text and
//! never an error; a failed outcome always carries an error and never text.

use serde::{Deserialize, Serialize};

/// Result of handling one piece of user input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The provider produced a completion
    Completed { text: String },

    /// The request failed; `error` is safe to show to the user
    Failed { error: String },
}

impl Outcome {
    /// Build a successful outcome
    pub fn completed(text: impl Into<String>) -> Self {
        Self::Completed { text: text.into() }
    }

    /// Build a failed outcome
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    /// The `ok` flag of the (ok, text, error) triple
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Completed { text } => Some(text),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Completed { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }

    /// Split into the `(ok, text, error)` triple front ends render
    pub fn into_parts(self) -> (bool, Option<String>, Option<String>) {
        match self {
            Self::Completed { text } => (true, Some(text), None),
            Self::Failed { error } => (false, None, Some(error)),
        }
    }

    /// Rewrite the text of a completed outcome, leaving failures untouched
    pub fn map_text<F>(self, f: F) -> Self
    where
        F: FnOnce(String) -> String,
    {
        match self {
            Self::Completed { text } => Self::Completed { text: f(text) },
            failed => failed,
        }
    }
}
