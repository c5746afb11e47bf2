mod provider;
mod session;

pub use provider::*;
pub use session::*;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::{ModelCatalog, ModelOption};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub session: SessionConfig,
    /// Selectable models. Empty means the built-in catalog.
    #[serde(default)]
    pub models: Vec<ModelOption>,
}

impl Config {
    pub fn catalog(&self) -> ModelCatalog {
        ModelCatalog::from_options(self.models.clone())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.provider.id.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "provider.id".into(),
                message: "provider id must not be empty".into(),
            });
        }

        if self.provider.base_url.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "provider.base_url".into(),
                message: "base_url must not be empty".into(),
            });
        } else if !self.provider.base_url.starts_with("http://")
            && !self.provider.base_url.starts_with("https://")
        {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "provider.base_url".into(),
                message: "base_url must start with http:// or https://".into(),
            });
        }

        if self.provider.request_timeout_ms == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "provider.request_timeout_ms".into(),
                message: "request timeout must be greater than 0".into(),
            });
        }

        if self.provider.auth.key.is_some() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "provider.auth.key".into(),
                message: "plaintext API key in config; prefer `env` or the keychain".into(),
            });
        }

        if self.session.default_model.trim().is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "session.default_model".into(),
                message: "default model must not be empty".into(),
            });
        } else if self.catalog().resolve(&self.session.default_model).is_none() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "session.default_model".into(),
                message: format!(
                    "\"{}\" is not in the model catalog",
                    self.session.default_model
                ),
            });
        }

        if self.session.turn_timeout_ms == Some(0) {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "session.turn_timeout_ms".into(),
                message: "turn timeout must be greater than 0 when set".into(),
            });
        }

        for (i, option) in self.models.iter().enumerate() {
            if option.model.trim().is_empty() {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: format!("models[{i}].model"),
                    message: "model id must not be empty".into(),
                });
            }
        }

        errors
    }
}
