// src/config.rs
//! Provider configuration
//!
//! Defaults come from the environment; a TOML file may override them.

use crate::logging::codes::{self, Code};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Errors raised while loading or validating the provider configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration value '{field}' is missing")]
    MissingValue { field: &'static str },

    #[error("Configuration value '{field}' is invalid: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn code(&self) -> Code {
        codes::config::INVALID_CONFIGURATION
    }
}

/// Resolved settings handed to the transport factory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub base_url: String,
    pub api_token: String,
    pub tls_skip_verify: bool,
}

/// Connection settings of the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API token sent with every request
    pub api_token: String,

    /// Host name of the Instana backend, without scheme
    pub endpoint: String,

    /// Skip TLS certificate verification
    pub tls_skip_verify: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_token: env::var("INSTANA_API_TOKEN").unwrap_or_default(),
            endpoint: env::var("INSTANA_ENDPOINT").unwrap_or_default(),
            tls_skip_verify: env::var("INSTANA_TLS_SKIP_VERIFY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

impl ProviderConfig {
    /// Create a configuration for an explicit endpoint
    pub fn new(api_token: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            endpoint: endpoint.into(),
            tls_skip_verify: false,
        }
    }

    /// Parse a TOML document; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn with_api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = api_token.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_tls_skip_verify(mut self, skip: bool) -> Self {
        self.tls_skip_verify = skip;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_token.trim().is_empty() {
            return Err(ConfigError::MissingValue { field: "api_token" });
        }
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingValue { field: "endpoint" });
        }
        if self.endpoint.contains("://") {
            return Err(ConfigError::InvalidValue {
                field: "endpoint",
                reason: "must be a host name without scheme".to_string(),
            });
        }
        if self.endpoint.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidValue {
                field: "endpoint",
                reason: "must not contain whitespace".to_string(),
            });
        }
        Ok(())
    }

    /// Base URL all resource paths are appended to
    pub fn base_url(&self) -> String {
        format!("https://{}", self.endpoint.trim_end_matches('/'))
    }

    /// Settings a transport needs to reach the configured backend
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            base_url: self.base_url(),
            api_token: self.api_token.clone(),
            tls_skip_verify: self.tls_skip_verify,
        }
    }
}
