// src/mapping/specification.rs
//! Specification mapping
//!
//! Copies the envelope scalars in both directions and delegates each rule to
//! the rule variant mapper. The identity is only ever copied, never created.

use super::rules::{map_rule_group_to_rule, map_rule_to_state};
use super::{BlockReader, RuleGroup};
use crate::error::MappingError;
use crate::log_debug;
use crate::resource_data::ResourceData;
use crate::schema::fields::Field;
use instana_restapi::CustomEventSpecification;
use serde_json::Value;

/// Reflect a specification into the configuration tree, including its id
///
/// The configuration tree holds a single rule, so a specification carrying
/// more is rejected. Rules are mapped before anything is written, so a
/// failing rule leaves `data` untouched.
pub fn map_specification_to_state(
    specification: &CustomEventSpecification,
    data: &mut ResourceData,
) -> Result<(), MappingError> {
    check_single_rule(specification.rules.len())?;

    let rules = specification
        .rules
        .iter()
        .enumerate()
        .map(|(index, rule)| {
            let path = format!("{}.{}", Field::Rules, index);
            map_rule_to_state(rule, &path).map(Value::Object)
        })
        .collect::<Result<Vec<_>, _>>()?;

    data.set_id(specification.id.as_str());
    data.set(Field::Name, specification.name.as_str());
    data.set(Field::EntityType, specification.entity_type.as_str());
    data.set(Field::Query, specification.query.as_deref().unwrap_or_default());
    data.set(
        Field::Description,
        specification.description.as_deref().unwrap_or_default(),
    );
    data.set(
        Field::ExpirationTime,
        specification.expiration_time.unwrap_or(0),
    );
    data.set(Field::Triggering, specification.triggering);
    data.set(Field::Enabled, specification.enabled);
    data.set(Field::Rules, Value::Array(rules));

    log_debug!("Mapped specification to state",
        "id" => specification.id,
        "rules" => specification.rules.len()
    );
    Ok(())
}

/// Build a specification from the configuration tree
///
/// The tree must hold exactly one rules block with exactly one populated
/// rule group.
pub fn map_state_to_specification(
    data: &ResourceData,
) -> Result<CustomEventSpecification, MappingError> {
    if let Some(Value::Array(blocks)) = data.get(Field::Rules) {
        check_single_rule(blocks.len())?;
    }
    let reader = BlockReader::new(data.attributes(), "");

    let rules_block = reader
        .option_list(Field::Rules)?
        .ok_or_else(|| MappingError::NoRuleDefined {
            path: Field::Rules.to_string(),
        })?;

    let mut populated = Vec::new();
    for group in RuleGroup::ALL {
        if let Some(group_reader) = rules_block.option_list(group.field())? {
            populated.push((group, group_reader));
        }
    }

    let rule = match populated.as_slice() {
        [] => {
            return Err(MappingError::NoRuleDefined {
                path: rules_block.path().to_string(),
            })
        }
        [(group, group_reader)] => map_rule_group_to_rule(*group, group_reader)?,
        _ => {
            return Err(MappingError::AmbiguousRuleDefined {
                path: rules_block.path().to_string(),
                groups: populated
                    .iter()
                    .map(|(group, _)| group.field().to_string())
                    .collect(),
            })
        }
    };

    let specification = CustomEventSpecification {
        id: data.id().to_string(),
        name: reader.string(Field::Name)?,
        entity_type: reader.string(Field::EntityType)?,
        query: reader.optional_string(Field::Query)?,
        description: reader.optional_string(Field::Description)?,
        expiration_time: reader.optional_int(Field::ExpirationTime)?,
        triggering: reader.bool_or(Field::Triggering, false)?,
        enabled: reader.bool_or(Field::Enabled, true)?,
        rules: vec![rule],
    };

    log_debug!("Mapped state to specification",
        "id" => specification.id,
        "rule_type" => populated[0].0.rule_type().as_str()
    );
    Ok(specification)
}

fn check_single_rule(count: usize) -> Result<(), MappingError> {
    if count > 1 {
        return Err(MappingError::TooManyRules {
            path: Field::Rules.to_string(),
            count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_data::Block;
    use assert_matches::assert_matches;
    use instana_restapi::{EntityVerificationRule, MetricPattern, RuleSpecification, ThresholdRule};
    use serde_json::json;

    fn specification(rule: RuleSpecification) -> CustomEventSpecification {
        CustomEventSpecification {
            id: "custom-system-event-id".to_string(),
            name: "name".to_string(),
            entity_type: "entity_type".to_string(),
            query: Some("query".to_string()),
            description: Some("description".to_string()),
            expiration_time: Some(60000),
            triggering: true,
            enabled: true,
            rules: vec![rule],
        }
    }

    fn threshold(
        metric_name: Option<&str>,
        metric_pattern: Option<MetricPattern>,
    ) -> ThresholdRule {
        ThresholdRule {
            severity: 5,
            metric_name: metric_name.map(str::to_string),
            metric_pattern,
            window: 60000,
            rollup: Some(40000),
            aggregation: "sum".to_string(),
            condition_operator: "=".to_string(),
            condition_value: 1.2,
        }
    }

    fn state(rules: serde_json::Value) -> ResourceData {
        let mut data = ResourceData::from_json(json!({
            "name": "name",
            "entity_type": "entity_type",
            "query": "",
            "description": "",
            "expiration_time": 0,
            "rules": rules
        }));
        data.set_id("custom-system-event-id");
        data
    }

    #[test]
    fn test_entity_verification_rule_to_state() {
        let rule = RuleSpecification::EntityVerification(EntityVerificationRule {
            severity: 5,
            matching_entity_label: Some("matching-entity-label".to_string()),
            matching_entity_type: Some("matching-entity-type".to_string()),
            matching_operator: Some("startsWith".to_string()),
            offline_duration: Some(60000),
        });
        let mut data = ResourceData::new();

        map_specification_to_state(&specification(rule), &mut data).unwrap();

        assert_eq!(data.id(), "custom-system-event-id");
        assert_eq!(data.get(Field::ExpirationTime), Some(&json!(60000)));
        assert_eq!(
            data.get_by_path("rules.0.entity_verification.0.severity"),
            Some(&json!("warning"))
        );
        assert_eq!(
            data.get_by_path("rules.0.entity_verification.0.matching_operator"),
            Some(&json!("startsWith"))
        );
        assert_eq!(
            data.get_by_path("rules.0.entity_verification.0.offline_duration"),
            Some(&json!(60000))
        );
        assert_eq!(data.get_by_path("rules.0.system"), Some(&json!([])));
        assert_eq!(data.get_by_path("rules.0.threshold"), Some(&json!([])));
    }

    #[test]
    fn test_threshold_rule_with_metric_name_to_state() {
        let rule = RuleSpecification::Threshold(threshold(Some("metric_name"), None));
        let mut data = ResourceData::new();

        map_specification_to_state(&specification(rule), &mut data).unwrap();

        let threshold = data.get_by_path("rules.0.threshold").unwrap();
        assert_eq!(threshold.as_array().map(Vec::len), Some(1));
        assert_eq!(
            data.get_by_path("rules.0.threshold.0.metric_name"),
            Some(&json!("metric_name"))
        );
        assert_eq!(
            data.get_by_path("rules.0.threshold.0.metric_pattern"),
            Some(&json!([]))
        );
        assert_eq!(
            data.get_by_path("rules.0.threshold.0.window"),
            Some(&json!(60000))
        );
        assert_eq!(
            data.get_by_path("rules.0.threshold.0.rollup"),
            Some(&json!(40000))
        );
        assert_eq!(
            data.get_by_path("rules.0.threshold.0.aggregation"),
            Some(&json!("sum"))
        );
        assert_eq!(
            data.get_by_path("rules.0.threshold.0.condition_operator"),
            Some(&json!("="))
        );
        assert_eq!(
            data.get_by_path("rules.0.threshold.0.condition_value"),
            Some(&json!(1.2))
        );
    }

    #[test]
    fn test_threshold_rule_with_metric_pattern_to_state() {
        let pattern = MetricPattern {
            prefix: "prefix".to_string(),
            postfix: Some("postfix".to_string()),
            placeholder: Some("placeholder".to_string()),
            operator: "startsWith".to_string(),
        };
        let rule = RuleSpecification::Threshold(threshold(None, Some(pattern)));
        let mut data = ResourceData::new();

        map_specification_to_state(&specification(rule), &mut data).unwrap();

        assert_eq!(
            data.get_by_path("rules.0.threshold.0.metric_name"),
            Some(&json!(""))
        );
        assert_eq!(
            data.get_by_path("rules.0.threshold.0.metric_pattern"),
            Some(&json!([{
                "prefix": "prefix",
                "postfix": "postfix",
                "placeholder": "placeholder",
                "operator": "startsWith"
            }]))
        );
    }

    #[test]
    fn test_failing_rule_leaves_state_untouched() {
        let mut rule = threshold(Some("metric_name"), None);
        rule.severity = 123;
        let mut data = ResourceData::new();

        let err = map_specification_to_state(
            &specification(RuleSpecification::Threshold(rule)),
            &mut data,
        )
        .unwrap_err();

        assert!(err.to_string().contains("123 is not a valid severity"));
        assert_eq!(data, ResourceData::new());
    }

    #[test]
    fn test_state_without_populated_group_is_rejected() {
        let data = state(json!([{
            "entity_verification": [],
            "system": [],
            "threshold": []
        }]));

        let err = map_state_to_specification(&data).unwrap_err();

        assert_matches!(err, MappingError::NoRuleDefined { ref path } if path == "rules.0");
        assert!(err.to_string().contains("no supported rule defined"));
    }

    #[test]
    fn test_state_without_rules_block_is_rejected() {
        let data = state(json!([]));
        assert_matches!(
            map_state_to_specification(&data),
            Err(MappingError::NoRuleDefined { .. })
        );
    }

    #[test]
    fn test_state_with_invalid_severity_is_rejected() {
        for group in ["entity_verification", "system", "threshold"] {
            let mut rules_block = Block::new();
            rules_block.insert(group.to_string(), json!([{ "severity": "invalid" }]));
            let data = state(Value::Array(vec![Value::Object(rules_block)]));

            let err = map_state_to_specification(&data).unwrap_err();

            assert!(
                err.to_string().contains("invalid is not a valid severity"),
                "{}: {}",
                group,
                err
            );
        }
    }

    #[test]
    fn test_state_with_two_populated_groups_is_ambiguous() {
        let data = state(json!([{
            "system": [{ "severity": "warning", "system_rule_id": "id" }],
            "entity_verification": [{ "severity": "warning" }]
        }]));

        let err = map_state_to_specification(&data).unwrap_err();

        assert_matches!(err, MappingError::AmbiguousRuleDefined { ref groups, .. }
            if groups == &vec!["entity_verification".to_string(), "system".to_string()]);
    }

    #[test]
    fn test_state_to_specification_applies_defaults_and_collapses_zero_values() {
        let data = state(json!([{
            "system": [{ "severity": "critical", "system_rule_id": "system_rule_id" }]
        }]));

        let spec = map_state_to_specification(&data).unwrap();

        assert_eq!(spec.id, "custom-system-event-id");
        assert_eq!(spec.query, None);
        assert_eq!(spec.description, None);
        assert_eq!(spec.expiration_time, None);
        assert!(!spec.triggering);
        assert!(spec.enabled);
        assert_eq!(spec.rules.len(), 1);
        assert_eq!(spec.rules[0].severity(), 10);
    }

    #[test]
    fn test_specification_survives_inbound_then_outbound() {
        let rule = RuleSpecification::Threshold(threshold(Some("metric_name"), None));
        let original = specification(rule);
        let mut data = ResourceData::new();

        map_specification_to_state(&original, &mut data).unwrap();
        let mapped = map_state_to_specification(&data).unwrap();

        assert_eq!(mapped, original);
    }

    #[test]
    fn test_specification_with_two_rules_is_rejected_inbound() {
        let mut spec = specification(RuleSpecification::Threshold(threshold(
            Some("metric_name"),
            None,
        )));
        spec.rules.push(RuleSpecification::EntityVerification(
            EntityVerificationRule {
                severity: 10,
                ..Default::default()
            },
        ));
        let mut data = ResourceData::new();

        let err = map_specification_to_state(&spec, &mut data).unwrap_err();

        assert_matches!(err, MappingError::TooManyRules { ref path, count: 2 } if path == "rules");
        assert_eq!(data, ResourceData::new());
    }

    #[test]
    fn test_state_with_two_rules_blocks_is_rejected_outbound() {
        let data = state(json!([
            { "system": [{ "severity": "warning", "system_rule_id": "first" }] },
            { "system": [{ "severity": "critical", "system_rule_id": "second" }] }
        ]));

        let err = map_state_to_specification(&data).unwrap_err();

        assert_matches!(err, MappingError::TooManyRules { count: 2, .. });
        assert!(err.to_string().contains("only a single rule is supported"));
    }
}
