//! Error codes attached to logged failures
//!
//! Every error type of the provider maps onto one of these codes so that log
//! lines can be grouped without parsing messages.

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Code wrapper used by the logging macros
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// Configuration tree mapping error codes
pub mod mapping {
    use super::Code;

    pub const INVALID_SEVERITY: Code = Code::new("M001");
    pub const NO_RULE_DEFINED: Code = Code::new("M002");
    pub const AMBIGUOUS_RULE_DEFINED: Code = Code::new("M003");
    pub const CONFLICTING_METRIC_SELECTOR: Code = Code::new("M004");
    pub const INVALID_ATTRIBUTE: Code = Code::new("M005");
    pub const TOO_MANY_RULES: Code = Code::new("M006");
}

/// Schema validation error codes
pub mod schema {
    use super::Code;

    pub const SCHEMA_VIOLATION: Code = Code::new("S001");
}

/// REST API error codes
pub mod api {
    use super::Code;

    pub const UNSUPPORTED_RULE_TYPE: Code = Code::new("A001");
    pub const INVALID_DATA_OBJECT: Code = Code::new("A002");
    pub const SERIALIZATION_ERROR: Code = Code::new("A003");
    pub const RESOURCE_NOT_FOUND: Code = Code::new("A004");
    pub const TRANSPORT_ERROR: Code = Code::new("A005");
}

/// Resource operation error codes
pub mod resource {
    use super::Code;

    pub const MISSING_IDENTITY: Code = Code::new("R001");
}

/// Provider configuration error codes
pub mod config {
    use super::Code;

    pub const INVALID_CONFIGURATION: Code = Code::new("C001");
}

/// Get the description of a code
pub fn get_description(code: &str) -> Option<&'static str> {
    let description = match code {
        "M001" => "Severity is neither a known wire code nor a known token",
        "M002" => "Rules block has no populated rule group",
        "M003" => "Rules block has more than one populated rule group",
        "M004" => "Threshold rule sets both metric name and metric pattern",
        "M005" => "Configuration value has the wrong primitive type",
        "M006" => "Specification carries more than one rule",
        "S001" => "Configuration tree violates the resource schema",
        "A001" => "Server returned a rule with an unknown rule type",
        "A002" => "Data object failed validation before sending",
        "A003" => "Request or response body could not be encoded or decoded",
        "A004" => "Server does not know the addressed resource",
        "A005" => "Transport reported a failure",
        "R001" => "Operation needs an id the resource does not have yet",
        "C001" => "Provider configuration is incomplete or malformed",
        _ => return None,
    };
    Some(description)
}
