// src/error.rs
//! Error types for the REST API layer
//!
//! Covers decoding of server payloads, data object validation and transport
//! failures reported by the injected client.

/// Errors raised while talking to the Instana REST API
#[derive(Debug, thiserror::Error)]
pub enum RestApiError {
    #[error("unsupported rule type {rule_type}")]
    UnsupportedRuleType { rule_type: String },

    #[error("rule is missing the ruleType discriminator")]
    MissingRuleType,

    #[error("rules[{index}]: {source}")]
    InvalidRule {
        index: usize,
        source: Box<RestApiError>,
    },

    #[error("invalid data object: {reason}")]
    InvalidDataObject { reason: String },

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("resource '{id}' not found at {resource_path}")]
    NotFound { resource_path: String, id: String },

    #[error("request to {resource_path} failed: {reason}")]
    Transport {
        resource_path: String,
        reason: String,
    },
}

impl RestApiError {
    /// Create an invalid data object error
    pub fn invalid_data_object(reason: impl Into<String>) -> Self {
        Self::InvalidDataObject {
            reason: reason.into(),
        }
    }

    /// Whether the server reported the addressed resource as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
