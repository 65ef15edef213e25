// src/severity.rs
//! Severity codec
//!
//! Severities travel as integer codes on the wire and as lowercase tokens in
//! the configuration tree. Both domains are closed.

use std::fmt;

/// Urgency level of an event raised by a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Critical,
}

/// Raised when a raw value is in neither severity domain
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} is not a valid severity")]
pub struct InvalidSeverity(pub String);

impl Severity {
    pub const ALL: [Severity; 2] = [Severity::Warning, Severity::Critical];

    /// Integer code used by the REST API
    pub fn to_wire_value(self) -> i32 {
        match self {
            Severity::Warning => 5,
            Severity::Critical => 10,
        }
    }

    /// Token used in the configuration tree
    pub fn to_config_value(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    pub fn from_wire_value(value: i32) -> Result<Self, InvalidSeverity> {
        Self::ALL
            .into_iter()
            .find(|severity| severity.to_wire_value() == value)
            .ok_or_else(|| InvalidSeverity(value.to_string()))
    }

    pub fn from_config_value(value: &str) -> Result<Self, InvalidSeverity> {
        Self::ALL
            .into_iter()
            .find(|severity| severity.to_config_value() == value)
            .ok_or_else(|| InvalidSeverity(value.to_string()))
    }

    /// All configuration tokens, in declaration order
    pub fn config_values() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.to_config_value()).collect()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_config_value())
    }
}
