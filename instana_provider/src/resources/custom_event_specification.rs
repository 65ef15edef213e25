// src/resources/custom_event_specification.rs
//! Resource handle of custom event specifications

use super::{ResourceHandle, ResourceMetaData};
use crate::error::MappingError;
use crate::mapping::specification::{map_specification_to_state, map_state_to_specification};
use crate::resource_data::ResourceData;
use crate::schema::fields::{
    Field, AGGREGATIONS, CONDITION_OPERATORS, MATCHING_OPERATORS, METRIC_PATTERN_OPERATORS,
};
use crate::schema::{FieldSchema, ResourceSchema, ValueType};
use instana_restapi::{
    CustomEventSpecification, Severity, CUSTOM_EVENT_SPECIFICATION_RESOURCE_PATH,
};

/// Name of the resource kind
pub const RESOURCE_NAME: &str = "instana_custom_event_specification";

pub struct CustomEventSpecificationHandle {
    meta_data: ResourceMetaData,
}

impl CustomEventSpecificationHandle {
    pub fn new() -> Self {
        Self {
            meta_data: ResourceMetaData {
                resource_name: RESOURCE_NAME,
                schema: create_custom_event_specification_schema(),
                schema_version: 0,
            },
        }
    }
}

impl Default for CustomEventSpecificationHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHandle for CustomEventSpecificationHandle {
    type DataObject = CustomEventSpecification;

    fn meta_data(&self) -> &ResourceMetaData {
        &self.meta_data
    }

    fn resource_path(&self) -> &'static str {
        CUSTOM_EVENT_SPECIFICATION_RESOURCE_PATH
    }

    fn update_state(
        &self,
        data: &mut ResourceData,
        object: &CustomEventSpecification,
    ) -> Result<(), MappingError> {
        map_specification_to_state(object, data)
    }

    fn map_state_to_data_object(
        &self,
        data: &ResourceData,
    ) -> Result<CustomEventSpecification, MappingError> {
        map_state_to_specification(data)
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// Create the schema of the custom event specification configuration tree
pub fn create_custom_event_specification_schema() -> ResourceSchema {
    ResourceSchema::new()
        .with_field(Field::Name, FieldSchema::required(ValueType::String))
        .with_field(Field::EntityType, FieldSchema::required(ValueType::String))
        .with_field(Field::Query, FieldSchema::optional(ValueType::String))
        .with_field(
            Field::Triggering,
            FieldSchema::optional(ValueType::Bool).with_default(false),
        )
        .with_field(Field::Description, FieldSchema::optional(ValueType::String))
        .with_field(Field::ExpirationTime, FieldSchema::optional(ValueType::Int))
        .with_field(
            Field::Enabled,
            FieldSchema::optional(ValueType::Bool).with_default(true),
        )
        .with_field(
            Field::Rules,
            FieldSchema::required(ValueType::List)
                .with_min_items(1)
                .with_max_items(1)
                .with_element(rules_schema()),
        )
}

fn rules_schema() -> ResourceSchema {
    ResourceSchema::new()
        .with_field(
            Field::EntityVerification,
            zero_or_one(entity_verification_schema()),
        )
        .with_field(Field::System, zero_or_one(system_schema()))
        .with_field(Field::Threshold, zero_or_one(threshold_schema()))
}

fn zero_or_one(element: ResourceSchema) -> FieldSchema {
    FieldSchema::optional(ValueType::List)
        .with_max_items(1)
        .with_element(element)
}

fn severity_field() -> FieldSchema {
    FieldSchema::required(ValueType::String).with_allowed_values(&Severity::config_values())
}

fn entity_verification_schema() -> ResourceSchema {
    ResourceSchema::new()
        .with_field(Field::Severity, severity_field())
        .with_field(Field::MatchingEntityLabel, FieldSchema::optional(ValueType::String))
        .with_field(Field::MatchingEntityType, FieldSchema::optional(ValueType::String))
        .with_field(
            Field::MatchingOperator,
            FieldSchema::optional(ValueType::String).with_allowed_values(&MATCHING_OPERATORS),
        )
        .with_field(Field::OfflineDuration, FieldSchema::optional(ValueType::Int))
}

fn system_schema() -> ResourceSchema {
    ResourceSchema::new()
        .with_field(Field::Severity, severity_field())
        .with_field(Field::SystemRuleId, FieldSchema::optional(ValueType::String))
}

fn threshold_schema() -> ResourceSchema {
    ResourceSchema::new()
        .with_field(Field::Severity, severity_field())
        .with_field(
            Field::MetricName,
            FieldSchema::optional(ValueType::String).conflicts_with(Field::MetricPattern),
        )
        .with_field(Field::MetricPattern, zero_or_one(metric_pattern_schema()))
        .with_field(Field::Rollup, FieldSchema::optional(ValueType::Int))
        .with_field(Field::Window, FieldSchema::required(ValueType::Int))
        .with_field(
            Field::Aggregation,
            FieldSchema::required(ValueType::String).with_allowed_values(&AGGREGATIONS),
        )
        .with_field(
            Field::ConditionOperator,
            FieldSchema::required(ValueType::String).with_allowed_values(&CONDITION_OPERATORS),
        )
        .with_field(Field::ConditionValue, FieldSchema::required(ValueType::Float))
}

fn metric_pattern_schema() -> ResourceSchema {
    ResourceSchema::new()
        .with_field(Field::Prefix, FieldSchema::required(ValueType::String))
        .with_field(Field::Postfix, FieldSchema::optional(ValueType::String))
        .with_field(Field::Placeholder, FieldSchema::optional(ValueType::String))
        .with_field(
            Field::Operator,
            FieldSchema::required(ValueType::String)
                .with_allowed_values(&METRIC_PATTERN_OPERATORS),
        )
}
