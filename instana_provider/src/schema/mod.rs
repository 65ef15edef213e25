// src/schema/mod.rs
//! Schema declaration and validation of configuration trees
//!
//! A [`ResourceSchema`] is an ordered list of attribute specs. Nested blocks
//! are lists whose elements follow their own [`ResourceSchema`]; a list with
//! `max_items == 1` is a zero-or-one group.

pub mod fields;

use crate::error::{SchemaError, SchemaViolation, ViolationKind};
use crate::resource_data::Block;
use fields::Field;
use serde_json::Value;

/// Primitive type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Int,
    Float,
    Bool,
    List,
}

impl ValueType {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Int => value.is_i64() || value.is_u64(),
            ValueType::Float => value.is_number(),
            ValueType::Bool => value.is_boolean(),
            ValueType::List => value.is_array(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
}

/// Specification of a single attribute
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub value_type: ValueType,
    pub requirement: Requirement,
    pub default: Option<Value>,
    pub allowed_values: Vec<&'static str>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    /// Schema of the blocks contained in a list attribute
    pub element: Option<ResourceSchema>,
    pub conflicts_with: Vec<Field>,
}

impl FieldSchema {
    fn new(value_type: ValueType, requirement: Requirement) -> Self {
        Self {
            value_type,
            requirement,
            default: None,
            allowed_values: Vec::new(),
            min_items: None,
            max_items: None,
            element: None,
            conflicts_with: Vec::new(),
        }
    }

    pub fn required(value_type: ValueType) -> Self {
        Self::new(value_type, Requirement::Required)
    }

    pub fn optional(value_type: ValueType) -> Self {
        Self::new(value_type, Requirement::Optional)
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_allowed_values(mut self, allowed: &[&'static str]) -> Self {
        self.allowed_values = allowed.to_vec();
        self
    }

    pub fn with_min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    pub fn with_element(mut self, element: ResourceSchema) -> Self {
        self.element = Some(element);
        self
    }

    pub fn conflicts_with(mut self, other: Field) -> Self {
        self.conflicts_with.push(other);
        self
    }

    pub fn is_required(&self) -> bool {
        self.requirement == Requirement::Required
    }
}

/// Ordered set of attribute specs describing one block
#[derive(Debug, Clone, Default)]
pub struct ResourceSchema {
    fields: Vec<(Field, FieldSchema)>,
}

impl ResourceSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: Field, spec: FieldSchema) -> Self {
        self.fields.push((field, spec));
        self
    }

    pub fn get(&self, field: Field) -> Option<&FieldSchema> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, spec)| spec)
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, &FieldSchema)> {
        self.fields.iter().map(|(field, spec)| (*field, spec))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fill absent attributes that declare a default
    pub fn apply_defaults(&self, block: &mut Block) {
        for (field, spec) in &self.fields {
            if let Some(default) = &spec.default {
                let absent = block.get(field.as_str()).map_or(true, Value::is_null);
                if absent {
                    block.insert(field.as_str().to_string(), default.clone());
                }
            }
        }
    }

    /// Validate a block, reporting every violation found
    pub fn validate(&self, block: &Block) -> Result<(), SchemaError> {
        let mut violations = Vec::new();
        self.validate_block(block, "", &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::Invalid { violations })
        }
    }

    fn validate_block(&self, block: &Block, parent: &str, violations: &mut Vec<SchemaViolation>) {
        for key in block.keys() {
            if !self.fields.iter().any(|(field, _)| field.as_str() == key) {
                violations.push(SchemaViolation::new(
                    join_path(parent, key),
                    ViolationKind::UnknownField,
                ));
            }
        }

        for (field, spec) in &self.fields {
            let path = field.path_in(parent);
            let value = block.get(field.as_str()).filter(|v| !v.is_null());

            let Some(value) = value else {
                if spec.is_required() {
                    violations.push(SchemaViolation::new(path, ViolationKind::MissingRequired));
                }
                continue;
            };

            if !spec.value_type.accepts(value) {
                violations.push(SchemaViolation::new(
                    path,
                    ViolationKind::TypeMismatch {
                        expected: spec.value_type,
                        found: json_type_name(value).to_string(),
                    },
                ));
                continue;
            }

            if spec.is_required() && !is_set(value) {
                violations.push(SchemaViolation::new(path, ViolationKind::MissingRequired));
                continue;
            }

            if let Value::String(s) = value {
                if !s.is_empty()
                    && !spec.allowed_values.is_empty()
                    && !spec.allowed_values.contains(&s.as_str())
                {
                    violations.push(SchemaViolation::new(
                        path.clone(),
                        ViolationKind::NotAllowed {
                            value: s.clone(),
                            allowed: spec.allowed_values.clone(),
                        },
                    ));
                }
            }

            if is_set(value) {
                for other in &spec.conflicts_with {
                    if block.get(other.as_str()).map_or(false, is_set) {
                        violations.push(SchemaViolation::new(
                            path.clone(),
                            ViolationKind::Conflict {
                                other: other.path_in(parent),
                            },
                        ));
                    }
                }
            }

            if let Value::Array(items) = value {
                validate_items(spec, items, &path, violations);
            }
        }
    }
}

fn validate_items(
    spec: &FieldSchema,
    items: &[Value],
    path: &str,
    violations: &mut Vec<SchemaViolation>,
) {
    if let Some(max) = spec.max_items {
        if items.len() > max {
            violations.push(SchemaViolation::new(
                path,
                ViolationKind::TooManyItems {
                    max,
                    found: items.len(),
                },
            ));
        }
    }
    if let Some(min) = spec.min_items {
        if items.len() < min {
            violations.push(SchemaViolation::new(
                path,
                ViolationKind::TooFewItems {
                    min,
                    found: items.len(),
                },
            ));
        }
    }

    let Some(element) = &spec.element else {
        return;
    };
    for (index, item) in items.iter().enumerate() {
        let item_path = format!("{}.{}", path, index);
        match item {
            Value::Object(block) => element.validate_block(block, &item_path, violations),
            other => violations.push(SchemaViolation::new(
                item_path,
                ViolationKind::TypeMismatch {
                    expected: ValueType::List,
                    found: json_type_name(other).to_string(),
                },
            )),
        }
    }
}

/// Whether a value counts as populated
pub(crate) fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "block",
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}
