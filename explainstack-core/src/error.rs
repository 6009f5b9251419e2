//! Construction-time dispatch errors
//!
//! These indicate a deployment or configuration mistake rather than a
//! transient condition, so they abort the operation that hit them. Per-request
//! failures never use this type; they travel as [`crate::Outcome::Failed`].

use thiserror::Error;

/// Result type for operations that may need to build adapters or agents
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors raised while realizing providers and agents from configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The configuration names a provider type nobody registered
    #[error("Unsupported backend type: {requested}. Available: {}", .available.join(", "))]
    UnsupportedProviderType {
        requested: String,
        available: Vec<String>,
    },

    /// A required provider setting is absent
    #[error("{provider} config missing required key: {key}")]
    MissingProviderSetting { provider: String, key: String },

    /// A provider setting is present but unusable
    #[error("{provider} config has invalid value for {key}: {message}")]
    InvalidProviderSetting {
        provider: String,
        key: String,
        message: String,
    },

    /// The HTTP client backing an adapter could not be built
    #[error("Failed to create HTTP client for {provider}: {message}")]
    HttpClient { provider: String, message: String },
}

impl DispatchError {
    /// Whether this error came from validating provider settings
    pub fn is_settings_error(&self) -> bool {
        matches!(
            self,
            Self::MissingProviderSetting { .. } | Self::InvalidProviderSetting { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_lists_available() {
        let err = DispatchError::UnsupportedProviderType {
            requested: "llama".to_string(),
            available: vec!["openai".to_string(), "claude".to_string(), "gemini".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unsupported backend type: llama. Available: openai, claude, gemini"
        );
    }

    #[test]
    fn test_missing_key_message() {
        let err = DispatchError::MissingProviderSetting {
            provider: "Claude".to_string(),
            key: "api_key".to_string(),
        };
        assert_eq!(err.to_string(), "Claude config missing required key: api_key");
        assert!(err.is_settings_error());
    }
}
