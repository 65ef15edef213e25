// src/model.rs
//! Custom event specification data model
//!
//! Mirrors the JSON documents served under the custom event specification
//! resource path. Field names are lowerCamelCase on the wire; rules are a
//! closed set of variants discriminated by `ruleType`.

use crate::error::RestApiError;
use crate::rest_resource::InstanaDataObject;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Resource path of custom event specifications
pub const CUSTOM_EVENT_SPECIFICATION_RESOURCE_PATH: &str =
    "/api/events/settings/event-specifications/custom";

const RULE_TYPE_KEY: &str = "ruleType";
const RULES_KEY: &str = "rules";

/// Custom event specification as exchanged with the REST API
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomEventSpecification {
    /// Server-assigned identity, empty until the first create
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<i64>,
    #[serde(default)]
    pub triggering: bool,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub rules: Vec<RuleSpecification>,
}

/// Discriminator of the rule variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    EntityVerification,
    System,
    Threshold,
}

impl RuleType {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "entity_verification" => Some(Self::EntityVerification),
            "system" => Some(Self::System),
            "threshold" => Some(Self::Threshold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntityVerification => "entity_verification",
            Self::System => "system",
            Self::Threshold => "threshold",
        }
    }
}

/// A single rule of a custom event specification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "ruleType", rename_all = "snake_case")]
pub enum RuleSpecification {
    EntityVerification(EntityVerificationRule),
    System(SystemRule),
    Threshold(ThresholdRule),
}

/// Raises an event when matching entities go offline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityVerificationRule {
    /// Severity wire code
    pub severity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_entity_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_operator: Option<String>,
    /// Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline_duration: Option<i64>,
}

/// Delegates to a rule defined by the server
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemRule {
    pub severity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_rule_id: Option<String>,
}

/// Compares an aggregated metric against a constant
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdRule {
    pub severity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_pattern: Option<MetricPattern>,
    pub window: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollup: Option<i64>,
    pub aggregation: String,
    pub condition_operator: String,
    pub condition_value: f64,
}

/// Selects metrics by name pattern instead of an exact name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPattern {
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postfix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub operator: String,
}

impl RuleSpecification {
    pub fn rule_type(&self) -> RuleType {
        match self {
            Self::EntityVerification(_) => RuleType::EntityVerification,
            Self::System(_) => RuleType::System,
            Self::Threshold(_) => RuleType::Threshold,
        }
    }

    /// Severity wire code of the rule
    pub fn severity(&self) -> i32 {
        match self {
            Self::EntityVerification(rule) => rule.severity,
            Self::System(rule) => rule.severity,
            Self::Threshold(rule) => rule.severity,
        }
    }

    /// Decode a rule, dispatching on its `ruleType` tag
    pub fn from_json(value: Value) -> Result<Self, RestApiError> {
        let rule_type = {
            let tag = value
                .get(RULE_TYPE_KEY)
                .and_then(Value::as_str)
                .ok_or(RestApiError::MissingRuleType)?;
            RuleType::from_tag(tag).ok_or_else(|| RestApiError::UnsupportedRuleType {
                rule_type: tag.to_string(),
            })?
        };

        let rule = match rule_type {
            RuleType::EntityVerification => {
                Self::EntityVerification(serde_json::from_value(value)?)
            }
            RuleType::System => Self::System(serde_json::from_value(value)?),
            RuleType::Threshold => Self::Threshold(serde_json::from_value(value)?),
        };
        Ok(rule)
    }
}

impl<'de> Deserialize<'de> for RuleSpecification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(value).map_err(serde::de::Error::custom)
    }
}

impl ThresholdRule {
    /// Metric name and metric pattern are mutually exclusive
    pub fn has_conflicting_metric_selector(&self) -> bool {
        self.metric_name.is_some() && self.metric_pattern.is_some()
    }
}

impl CustomEventSpecification {
    /// Decode a server payload.
    ///
    /// Rules are decoded one by one so that an unknown `ruleType` surfaces as
    /// [`RestApiError::UnsupportedRuleType`] with the offending rule index.
    pub fn from_json(mut value: Value) -> Result<Self, RestApiError> {
        let rules = match value.as_object_mut().and_then(|obj| obj.remove(RULES_KEY)) {
            Some(Value::Array(rules)) => rules,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(RestApiError::invalid_data_object(format!(
                    "rules must be an array, got {}",
                    other
                )))
            }
        };

        let mut specification: CustomEventSpecification = serde_json::from_value(value)?;
        specification.rules = rules
            .into_iter()
            .enumerate()
            .map(|(index, rule)| {
                RuleSpecification::from_json(rule).map_err(|e| RestApiError::InvalidRule {
                    index,
                    source: Box::new(e),
                })
            })
            .collect::<Result<_, _>>()?;

        Ok(specification)
    }
}

impl InstanaDataObject for CustomEventSpecification {
    fn id_for_resource_path(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), RestApiError> {
        if self.name.trim().is_empty() {
            return Err(RestApiError::invalid_data_object("name is missing"));
        }
        if self.entity_type.trim().is_empty() {
            return Err(RestApiError::invalid_data_object("entity type is missing"));
        }
        if self.rules.is_empty() {
            return Err(RestApiError::invalid_data_object("no rules defined"));
        }
        for (index, rule) in self.rules.iter().enumerate() {
            if let RuleSpecification::Threshold(threshold) = rule {
                if threshold.has_conflicting_metric_selector() {
                    return Err(RestApiError::invalid_data_object(format!(
                        "rule {}: metric name and metric pattern are mutually exclusive",
                        index
                    )));
                }
            }
        }
        Ok(())
    }

    fn from_json(value: Value) -> Result<Self, RestApiError> {
        CustomEventSpecification::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn threshold_response() -> Value {
        json!({
            "id": "custom-system-event-id",
            "name": "name 0",
            "entityType": "entity_type",
            "query": "query",
            "enabled": true,
            "triggering": true,
            "description": "description",
            "expirationTime": 60000,
            "rules": [{
                "ruleType": "threshold",
                "severity": 5,
                "metricPattern": {
                    "prefix": "prefix",
                    "postfix": "postfix",
                    "placeholder": "placeholder",
                    "operator": "startsWith"
                },
                "aggregation": "sum",
                "window": 60000,
                "rollup": 40000,
                "conditionOperator": "=",
                "conditionValue": 1.2
            }]
        })
    }

    #[test]
    fn test_decode_threshold_rule_with_metric_pattern() {
        let spec = CustomEventSpecification::from_json(threshold_response()).unwrap();

        assert_eq!(spec.id, "custom-system-event-id");
        assert_eq!(spec.expiration_time, Some(60000));
        assert_eq!(spec.rules.len(), 1);

        let rule = assert_matches!(&spec.rules[0], RuleSpecification::Threshold(rule) => rule);
        assert_eq!(rule.severity, 5);
        assert_eq!(rule.metric_name, None);
        assert_eq!(rule.window, 60000);
        assert_eq!(rule.rollup, Some(40000));
        assert_eq!(rule.condition_value, 1.2);

        let pattern = rule.metric_pattern.as_ref().unwrap();
        assert_eq!(pattern.prefix, "prefix");
        assert_eq!(pattern.postfix.as_deref(), Some("postfix"));
        assert_eq!(pattern.operator, "startsWith");
    }

    #[test]
    fn test_decode_entity_verification_and_system_rules() {
        let ev = RuleSpecification::from_json(json!({
            "ruleType": "entity_verification",
            "severity": 5,
            "matchingEntityLabel": "matching-entity-label",
            "matchingEntityType": "matching-entity-type",
            "matchingOperator": "startsWith",
            "offlineDuration": 60000
        }))
        .unwrap();
        assert_eq!(ev.rule_type(), RuleType::EntityVerification);
        assert_matches!(
            ev,
            RuleSpecification::EntityVerification(rule) if rule.offline_duration == Some(60000)
        );

        let system = RuleSpecification::from_json(json!({
            "ruleType": "system",
            "severity": 10,
            "systemRuleId": "system_rule_id"
        }))
        .unwrap();
        assert_eq!(system.severity(), 10);
        assert_matches!(
            system,
            RuleSpecification::System(rule)
                if rule.system_rule_id.as_deref() == Some("system_rule_id")
        );
    }

    #[test]
    fn test_unknown_rule_type_is_rejected_with_tag() {
        let mut payload = threshold_response();
        payload["rules"][0]["ruleType"] = json!("invalid");

        let err = CustomEventSpecification::from_json(payload).unwrap_err();

        assert_matches!(
            &err,
            RestApiError::InvalidRule { index: 0, source }
                if matches!(
                    source.as_ref(),
                    RestApiError::UnsupportedRuleType { rule_type } if rule_type == "invalid"
                )
        );
        assert!(err.to_string().contains("unsupported rule type invalid"));
    }

    #[test]
    fn test_missing_rule_type_is_rejected() {
        let err = RuleSpecification::from_json(json!({ "severity": 5 })).unwrap_err();
        assert_matches!(err, RestApiError::MissingRuleType);
    }

    #[test]
    fn test_serde_deserialize_uses_rule_dispatch() {
        let result: Result<CustomEventSpecification, _> = serde_json::from_value(json!({
            "name": "name",
            "entityType": "host",
            "rules": [{ "ruleType": "unknown", "severity": 5 }]
        }));

        let err = result.unwrap_err();
        assert!(err.to_string().contains("unsupported rule type unknown"));
    }

    #[test]
    fn test_serialize_writes_rule_type_tag_and_skips_absent_fields() {
        let spec = CustomEventSpecification {
            name: "name".to_string(),
            entity_type: "any".to_string(),
            enabled: true,
            rules: vec![RuleSpecification::System(SystemRule {
                severity: 5,
                system_rule_id: Some("system-rule-id".to_string()),
            })],
            ..Default::default()
        };

        let value = serde_json::to_value(&spec).unwrap();

        assert_eq!(value["rules"][0]["ruleType"], json!("system"));
        assert_eq!(value["rules"][0]["systemRuleId"], json!("system-rule-id"));
        assert_eq!(value["entityType"], json!("any"));
        assert!(value.get("query").is_none());
        assert!(value.get("expirationTime").is_none());
    }

    #[test]
    fn test_validate_data_object() {
        let mut spec = CustomEventSpecification::from_json(threshold_response()).unwrap();
        assert!(spec.validate().is_ok());

        if let RuleSpecification::Threshold(rule) = &mut spec.rules[0] {
            rule.metric_name = Some("metric_name".to_string());
        }
        let err = spec.validate().unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));

        spec.rules.clear();
        assert_matches!(spec.validate(), Err(RestApiError::InvalidDataObject { .. }));
    }

    #[test]
    fn test_rule_type_tags() {
        for rule_type in [RuleType::EntityVerification, RuleType::System, RuleType::Threshold] {
            assert_eq!(RuleType::from_tag(rule_type.as_str()), Some(rule_type));
        }
        assert_eq!(RuleType::from_tag("invalid"), None);
    }
}
