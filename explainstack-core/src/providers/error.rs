//! Provider error types and handling
//!
//! Each adapter maps its API's failures onto [`ProviderErrorKind`] so callers
//! never have to special-case a provider. The rendered message is always
//! prefixed with the provider's display name.

use thiserror::Error;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Provider-agnostic failure categories
///
/// The rendered text is the tail of the user-facing message; [`ProviderError`]
/// prefixes it with the provider's display name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderErrorKind {
    /// Provider signalled throttling
    #[error("rate limit exceeded. Please try again in a few minutes.")]
    RateLimited,

    /// Input or parameters rejected by the provider
    #[error("invalid request. Please check your input.")]
    InvalidRequest,

    /// Credential rejected
    #[error("authentication error. Please check your API key.")]
    AuthenticationFailed,

    /// DNS, TLS, timeout, refused connection
    #[error("API connection error. Please check your internet connection.")]
    ConnectionFailed,

    /// Anything else, carrying the provider's own message
    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl ProviderErrorKind {
    /// Short machine-friendly label, used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::InvalidRequest => "invalid_request",
            Self::AuthenticationFailed => "authentication_failed",
            Self::ConnectionFailed => "connection_failed",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Whether a caller wrapping this layer could reasonably retry later
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ConnectionFailed)
    }
}

/// A failed provider call, tagged with the provider's display name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{provider} {kind}")]
pub struct ProviderError {
    /// Display name of the provider that failed (e.g. "OpenAI")
    pub provider: String,

    /// What went wrong
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: impl Into<String>, kind: ProviderErrorKind) -> Self {
        Self {
            provider: provider.into(),
            kind,
        }
    }

    pub fn rate_limited(provider: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorKind::RateLimited)
    }

    pub fn invalid_request(provider: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorKind::InvalidRequest)
    }

    pub fn authentication(provider: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorKind::AuthenticationFailed)
    }

    pub fn connection(provider: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorKind::ConnectionFailed)
    }

    pub fn unknown(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorKind::Unknown(message.into()))
    }
}
