//! Configuration for ExplainStack
//!
//! The agent binding schema, file loaders with `${VAR}` interpolation, the
//! environment and per-user credential overlays, and strict validation.

mod env;
mod error;
mod schema;
mod secrets;
mod validator;

pub use env::{extract_env_vars, interpolate_env_vars};
pub use error::{ConfigError, ConfigResult, ValidationError, ValidationErrorKind};
pub use schema::{AgentBinding, DispatchConfig, InputLimits, UserCredentials};
pub use secrets::{is_sensitive_field, redact_by_field_name, SecretString};
pub use validator::ConfigValidator;

use std::fs;
use std::path::Path;
use tracing::info;

/// Load a configuration from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> ConfigResult<DispatchConfig> {
    let path = path.as_ref();
    let content = read(path)?;
    let config = parse_yaml(&content, &path.to_string_lossy())?;
    finish_load(path, config)
}

/// Load a configuration from a JSON file
pub fn load_from_json<P: AsRef<Path>>(path: P) -> ConfigResult<DispatchConfig> {
    let path = path.as_ref();
    let content = read(path)?;

    let interpolated = env::interpolate_env_vars(&content)?;
    let config: DispatchConfig =
        serde_json::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
            path: path.to_string_lossy().to_string(),
            line: Some(e.line()),
            column: Some(e.column()),
            message: e.to_string(),
        })?;

    finish_load(path, config)
}

/// Parse and validate an in-memory YAML document
pub fn from_yaml_str(content: &str) -> ConfigResult<DispatchConfig> {
    let config = parse_yaml(content, "<string>")?;
    ConfigValidator::new().validate(&config)?;
    Ok(config)
}

fn read(path: &Path) -> ConfigResult<String> {
    fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

fn parse_yaml(content: &str, origin: &str) -> ConfigResult<DispatchConfig> {
    // Interpolate environment variables before parsing
    let interpolated = env::interpolate_env_vars(content)?;

    serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
        path: origin.to_string(),
        line: e.location().map(|l| l.line()),
        column: e.location().map(|l| l.column()),
        message: e.to_string(),
    })
}

fn finish_load(path: &Path, config: DispatchConfig) -> ConfigResult<DispatchConfig> {
    ConfigValidator::new().validate(&config)?;
    info!(
        "Loaded configuration from {} with {} agent bindings",
        path.display(),
        config.agents.len()
    );
    Ok(config)
}
