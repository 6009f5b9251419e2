//! Secrets handling and redaction for configuration
//!
//! API keys live in [`SecretString`], which never prints its value through
//! `Debug` or `Display`. Free-form settings bags are redacted by key name with
//! [`redact_by_field_name`] before they reach a log line.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Field-name fragments that mark a value as sensitive
const SENSITIVE_PATTERNS: [&str; 8] = [
    "api_key",
    "apikey",
    "secret",
    "token",
    "password",
    "credential",
    "auth",
    "private",
];

/// Token-count settings that would otherwise match the "token" pattern
const TOKEN_COUNT_FIELDS: [&str; 2] = ["max_tokens", "maxtokens"];

/// API key that prints as `[REDACTED]` but serializes its real value
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The raw key, for building request headers
    pub fn expose_secret(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Whether a field name looks like it holds a credential
pub fn is_sensitive_field(field_name: &str) -> bool {
    let field_lower = field_name.to_lowercase();
    if TOKEN_COUNT_FIELDS.contains(&field_lower.as_str()) {
        return false;
    }
    SENSITIVE_PATTERNS
        .iter()
        .any(|pattern| field_lower.contains(pattern))
}

/// Redact a value if its field name looks sensitive
pub fn redact_by_field_name(field_name: &str, value: &str) -> String {
    if is_sensitive_field(field_name) {
        "[REDACTED]".to_string()
    } else {
        value.to_string()
    }
}
