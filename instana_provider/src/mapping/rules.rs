// src/mapping/rules.rs
//! Rule variant mapping
//!
//! Inbound, a rule becomes a rules block carrying all three group keys: the
//! group of the rule as a one-element list, the other two as empty lists.
//! Outbound, the populated group selects the variant.

use super::{to_option_list, BlockReader, RuleGroup};
use crate::error::MappingError;
use crate::log_debug;
use crate::resource_data::Block;
use crate::schema::fields::Field;
use instana_restapi::{
    EntityVerificationRule, MetricPattern, RuleSpecification, Severity, SystemRule, ThresholdRule,
};
use serde_json::Value;

// ============================================================================
// INBOUND
// ============================================================================

/// Map a rule onto a rules block located at `path`
pub fn map_rule_to_state(rule: &RuleSpecification, path: &str) -> Result<Block, MappingError> {
    let group = RuleGroup::from_rule_type(rule.rule_type());
    let group_path = format!("{}.0", group.field().path_in(path));

    let severity = Severity::from_wire_value(rule.severity()).map_err(|source| {
        MappingError::Severity {
            path: Field::Severity.path_in(&group_path),
            source,
        }
    })?;

    let body = match rule {
        RuleSpecification::EntityVerification(rule) => entity_verification_body(rule, severity),
        RuleSpecification::System(rule) => system_body(rule, severity),
        RuleSpecification::Threshold(rule) => threshold_body(rule, severity, &group_path)?,
    };

    log_debug!("Mapped rule to state",
        "path" => path,
        "rule_type" => rule.rule_type().as_str(),
        "severity" => severity
    );

    let mut rules_block = Block::new();
    let mut body = Some(body);
    for candidate in RuleGroup::ALL {
        let content = if candidate == group { body.take() } else { None };
        rules_block.insert(candidate.field().to_string(), to_option_list(content));
    }
    Ok(rules_block)
}

fn entity_verification_body(rule: &EntityVerificationRule, severity: Severity) -> Block {
    let mut body = Block::new();
    insert(&mut body, Field::Severity, severity.to_config_value());
    insert(&mut body, Field::MatchingEntityLabel, string_or_empty(&rule.matching_entity_label));
    insert(&mut body, Field::MatchingEntityType, string_or_empty(&rule.matching_entity_type));
    insert(&mut body, Field::MatchingOperator, string_or_empty(&rule.matching_operator));
    insert(&mut body, Field::OfflineDuration, rule.offline_duration.unwrap_or(0));
    body
}

fn system_body(rule: &SystemRule, severity: Severity) -> Block {
    let mut body = Block::new();
    insert(&mut body, Field::Severity, severity.to_config_value());
    insert(&mut body, Field::SystemRuleId, string_or_empty(&rule.system_rule_id));
    body
}

fn threshold_body(
    rule: &ThresholdRule,
    severity: Severity,
    group_path: &str,
) -> Result<Block, MappingError> {
    if rule.has_conflicting_metric_selector() {
        return Err(MappingError::ConflictingMetricSelector {
            path: group_path.to_string(),
        });
    }

    let mut body = Block::new();
    insert(&mut body, Field::Severity, severity.to_config_value());
    insert(&mut body, Field::MetricName, string_or_empty(&rule.metric_name));
    insert(
        &mut body,
        Field::MetricPattern,
        to_option_list(rule.metric_pattern.as_ref().map(metric_pattern_body)),
    );
    insert(&mut body, Field::Rollup, rule.rollup.unwrap_or(0));
    insert(&mut body, Field::Window, rule.window);
    insert(&mut body, Field::Aggregation, rule.aggregation.as_str());
    insert(&mut body, Field::ConditionOperator, rule.condition_operator.as_str());
    insert(&mut body, Field::ConditionValue, rule.condition_value);
    Ok(body)
}

fn metric_pattern_body(pattern: &MetricPattern) -> Block {
    let mut body = Block::new();
    insert(&mut body, Field::Prefix, pattern.prefix.as_str());
    insert(&mut body, Field::Postfix, string_or_empty(&pattern.postfix));
    insert(&mut body, Field::Placeholder, string_or_empty(&pattern.placeholder));
    insert(&mut body, Field::Operator, pattern.operator.as_str());
    body
}

fn insert(block: &mut Block, field: Field, value: impl Into<Value>) {
    block.insert(field.as_str().to_string(), value.into());
}

fn string_or_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

// ============================================================================
// OUTBOUND
// ============================================================================

/// Build the rule of `group` from the group's block
pub fn map_rule_group_to_rule(
    group: RuleGroup,
    reader: &BlockReader<'_>,
) -> Result<RuleSpecification, MappingError> {
    let severity = read_severity(reader)?.to_wire_value();

    let rule = match group {
        RuleGroup::EntityVerification => {
            RuleSpecification::EntityVerification(EntityVerificationRule {
                severity,
                matching_entity_label: reader.optional_string(Field::MatchingEntityLabel)?,
                matching_entity_type: reader.optional_string(Field::MatchingEntityType)?,
                matching_operator: reader.optional_string(Field::MatchingOperator)?,
                offline_duration: reader.optional_int(Field::OfflineDuration)?,
            })
        }
        RuleGroup::System => RuleSpecification::System(SystemRule {
            severity,
            system_rule_id: reader.optional_string(Field::SystemRuleId)?,
        }),
        RuleGroup::Threshold => {
            let metric_pattern = reader
                .option_list(Field::MetricPattern)?
                .map(|pattern| map_metric_pattern(&pattern))
                .transpose()?;
            let metric_name = match metric_pattern {
                Some(_) => None,
                None => reader.optional_string(Field::MetricName)?,
            };

            RuleSpecification::Threshold(ThresholdRule {
                severity,
                metric_name,
                metric_pattern,
                window: reader.int(Field::Window)?,
                rollup: reader.optional_int(Field::Rollup)?,
                aggregation: reader.string(Field::Aggregation)?,
                condition_operator: reader.string(Field::ConditionOperator)?,
                condition_value: reader.float(Field::ConditionValue)?,
            })
        }
    };

    log_debug!("Mapped rule group to rule",
        "path" => reader.path(),
        "rule_type" => group.rule_type().as_str()
    );
    Ok(rule)
}

fn read_severity(reader: &BlockReader<'_>) -> Result<Severity, MappingError> {
    let token = reader.string(Field::Severity)?;
    Severity::from_config_value(&token).map_err(|source| MappingError::Severity {
        path: reader.field_path(Field::Severity),
        source,
    })
}

fn map_metric_pattern(reader: &BlockReader<'_>) -> Result<MetricPattern, MappingError> {
    Ok(MetricPattern {
        prefix: reader.string(Field::Prefix)?,
        postfix: reader.optional_string(Field::Postfix)?,
        placeholder: reader.optional_string(Field::Placeholder)?,
        operator: reader.string(Field::Operator)?,
    })
}
