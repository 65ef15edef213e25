// src/error.rs
//! Error types for the provider
//!
//! Mapping errors carry the dot path of the offending configuration node,
//! schema errors collect every violation found in one pass.

use crate::logging::codes::{self, Code};
use crate::schema::ValueType;
use instana_restapi::{InvalidSeverity, RestApiError};

/// Errors raised while mapping between the configuration tree and the data model
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("{path}: {source}")]
    Severity {
        path: String,
        #[source]
        source: InvalidSeverity,
    },

    #[error("{path}: no supported rule defined")]
    NoRuleDefined { path: String },

    #[error("{path}: more than one rule defined ({})", .groups.join(", "))]
    AmbiguousRuleDefined { path: String, groups: Vec<String> },

    #[error("{path}: only a single rule is supported, found {count}")]
    TooManyRules { path: String, count: usize },

    #[error("{path}: metric_name and metric_pattern are mutually exclusive")]
    ConflictingMetricSelector { path: String },

    #[error("{path}: expected {expected}, found {found}")]
    InvalidAttribute {
        path: String,
        expected: &'static str,
        found: String,
    },
}

impl MappingError {
    pub fn invalid_attribute(
        path: impl Into<String>,
        expected: &'static str,
        found: &serde_json::Value,
    ) -> Self {
        Self::InvalidAttribute {
            path: path.into(),
            expected,
            found: found.to_string(),
        }
    }

    pub fn code(&self) -> Code {
        match self {
            Self::Severity { .. } => codes::mapping::INVALID_SEVERITY,
            Self::NoRuleDefined { .. } => codes::mapping::NO_RULE_DEFINED,
            Self::AmbiguousRuleDefined { .. } => codes::mapping::AMBIGUOUS_RULE_DEFINED,
            Self::TooManyRules { .. } => codes::mapping::TOO_MANY_RULES,
            Self::ConflictingMetricSelector { .. } => codes::mapping::CONFLICTING_METRIC_SELECTOR,
            Self::InvalidAttribute { .. } => codes::mapping::INVALID_ATTRIBUTE,
        }
    }
}

/// Kind of a single schema violation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViolationKind {
    #[error("required attribute is missing")]
    MissingRequired,

    #[error("expected {expected:?}, found {found}")]
    TypeMismatch { expected: ValueType, found: String },

    #[error("'{value}' is not one of {allowed:?}")]
    NotAllowed {
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("at most {max} item(s) allowed, found {found}")]
    TooManyItems { max: usize, found: usize },

    #[error("at least {min} item(s) required, found {found}")]
    TooFewItems { min: usize, found: usize },

    #[error("conflicts with '{other}'")]
    Conflict { other: String },

    #[error("attribute is not part of the schema")]
    UnknownField,
}

/// A violation located by its dot path
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaViolation {
    pub path: String,
    pub kind: ViolationKind,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

/// Schema validation errors
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("configuration violates the resource schema: {}", join_violations(.violations))]
    Invalid { violations: Vec<SchemaViolation> },
}

impl SchemaError {
    pub fn violations(&self) -> &[SchemaViolation] {
        match self {
            Self::Invalid { violations } => violations,
        }
    }
}

fn join_violations(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Aggregated error of resource operations
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Api(#[from] RestApiError),

    #[error("cannot {operation} {resource}: the resource has no id")]
    MissingIdentity {
        operation: &'static str,
        resource: &'static str,
    },
}

impl ResourceError {
    /// Logging code of the underlying failure
    pub fn code(&self) -> Code {
        match self {
            Self::Mapping(e) => e.code(),
            Self::Schema(_) => codes::schema::SCHEMA_VIOLATION,
            Self::Api(e) => api_code(e),
            Self::MissingIdentity { .. } => codes::resource::MISSING_IDENTITY,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_not_found())
    }
}

fn api_code(error: &RestApiError) -> Code {
    match error {
        RestApiError::UnsupportedRuleType { .. } | RestApiError::MissingRuleType => {
            codes::api::UNSUPPORTED_RULE_TYPE
        }
        RestApiError::InvalidRule { source, .. } => api_code(source),
        RestApiError::InvalidDataObject { .. } => codes::api::INVALID_DATA_OBJECT,
        RestApiError::Decode(_) | RestApiError::Encode(_) => codes::api::SERIALIZATION_ERROR,
        RestApiError::NotFound { .. } => codes::api::RESOURCE_NOT_FOUND,
        RestApiError::Transport { .. } => codes::api::TRANSPORT_ERROR,
    }
}
