// src/schema/fields.rs
//! Attribute names of the custom event specification configuration tree
//!
//! Schema declaration and both mapping directions address attributes through
//! this enumeration only.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    // Specification envelope
    Name,
    EntityType,
    Query,
    Triggering,
    Description,
    ExpirationTime,
    Enabled,
    Rules,

    // Rule groups
    EntityVerification,
    System,
    Threshold,

    // Rule bodies
    Severity,
    MatchingEntityLabel,
    MatchingEntityType,
    MatchingOperator,
    OfflineDuration,
    SystemRuleId,
    MetricName,
    MetricPattern,
    Rollup,
    Window,
    Aggregation,
    ConditionOperator,
    ConditionValue,

    // Metric pattern
    Prefix,
    Postfix,
    Placeholder,
    Operator,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::EntityType => "entity_type",
            Field::Query => "query",
            Field::Triggering => "triggering",
            Field::Description => "description",
            Field::ExpirationTime => "expiration_time",
            Field::Enabled => "enabled",
            Field::Rules => "rules",
            Field::EntityVerification => "entity_verification",
            Field::System => "system",
            Field::Threshold => "threshold",
            Field::Severity => "severity",
            Field::MatchingEntityLabel => "matching_entity_label",
            Field::MatchingEntityType => "matching_entity_type",
            Field::MatchingOperator => "matching_operator",
            Field::OfflineDuration => "offline_duration",
            Field::SystemRuleId => "system_rule_id",
            Field::MetricName => "metric_name",
            Field::MetricPattern => "metric_pattern",
            Field::Rollup => "rollup",
            Field::Window => "window",
            Field::Aggregation => "aggregation",
            Field::ConditionOperator => "condition_operator",
            Field::ConditionValue => "condition_value",
            Field::Prefix => "prefix",
            Field::Postfix => "postfix",
            Field::Placeholder => "placeholder",
            Field::Operator => "operator",
        }
    }

    /// Dot path of this field below `parent`
    pub fn path_in(&self, parent: &str) -> String {
        if parent.is_empty() {
            self.as_str().to_string()
        } else {
            format!("{}.{}", parent, self.as_str())
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operators matching entity labels in entity verification rules
pub const MATCHING_OPERATORS: [&str; 5] = ["is", "contains", "startsWith", "endsWith", "none"];

/// Aggregations supported by threshold rules
pub const AGGREGATIONS: [&str; 4] = ["sum", "avg", "min", "max"];

/// Comparison operators of threshold rules
pub const CONDITION_OPERATORS: [&str; 6] = ["=", "!=", "<", "<=", ">", ">="];

/// Operators of metric patterns
pub const METRIC_PATTERN_OPERATORS: [&str; 5] = ["is", "contains", "any", "startsWith", "endsWith"];
