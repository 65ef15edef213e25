// src/mapping/mod.rs
//! Mapping between the configuration tree and the REST data model
//!
//! Nested optional groups of the configuration tree are zero-or-one lists.
//! [`to_option_list`] and [`from_option_list`] are the only places that know
//! about that encoding; everything else works with `Option<Block>`.

pub mod rules;
pub mod specification;

use crate::error::MappingError;
use crate::resource_data::Block;
use crate::schema::fields::Field;
use instana_restapi::RuleType;
use serde_json::Value;

// ============================================================================
// ZERO-OR-ONE LISTS
// ============================================================================

/// Render an optional block as a zero-or-one list
pub fn to_option_list(block: Option<Block>) -> Value {
    Value::Array(block.map(Value::Object).into_iter().collect())
}

/// Read the single block of a zero-or-one list
///
/// Missing, null and empty lists all read as `None`. Only the first item is
/// considered; the schema limits these lists to one item.
pub fn from_option_list<'a>(
    value: Option<&'a Value>,
    path: &str,
) -> Result<Option<&'a Block>, MappingError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => match items.first() {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(block)) => Ok(Some(block)),
            Some(other) => Err(MappingError::invalid_attribute(
                format!("{}.0", path),
                "block",
                other,
            )),
        },
        Some(other) => Err(MappingError::invalid_attribute(path, "list", other)),
    }
}

// ============================================================================
// BLOCK READER
// ============================================================================

/// Typed read access to one block of the configuration tree
///
/// Absent values read as their zero value; values of the wrong primitive type
/// are rejected with the attribute path.
#[derive(Debug, Clone)]
pub struct BlockReader<'a> {
    block: &'a Block,
    path: String,
}

impl<'a> BlockReader<'a> {
    pub fn new(block: &'a Block, path: impl Into<String>) -> Self {
        Self {
            block,
            path: path.into(),
        }
    }

    /// Dot path of this block
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn field_path(&self, field: Field) -> String {
        field.path_in(&self.path)
    }

    fn value(&self, field: Field) -> Option<&'a Value> {
        self.block.get(field.as_str()).filter(|v| !v.is_null())
    }

    fn invalid(&self, field: Field, expected: &'static str, found: &Value) -> MappingError {
        MappingError::invalid_attribute(self.field_path(field), expected, found)
    }

    pub fn string(&self, field: Field) -> Result<String, MappingError> {
        match self.value(field) {
            None => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(self.invalid(field, "string", other)),
        }
    }

    /// String that collapses to `None` when empty
    pub fn optional_string(&self, field: Field) -> Result<Option<String>, MappingError> {
        let value = self.string(field)?;
        Ok(if value.is_empty() { None } else { Some(value) })
    }

    pub fn int(&self, field: Field) -> Result<i64, MappingError> {
        match self.value(field) {
            None => Ok(0),
            Some(value @ Value::Number(n)) => {
                n.as_i64().ok_or_else(|| self.invalid(field, "int", value))
            }
            Some(Value::String(s)) if s.is_empty() => Ok(0),
            Some(value @ Value::String(s)) => s
                .trim()
                .parse()
                .map_err(|_| self.invalid(field, "int", value)),
            Some(other) => Err(self.invalid(field, "int", other)),
        }
    }

    /// Integer that collapses to `None` when zero
    pub fn optional_int(&self, field: Field) -> Result<Option<i64>, MappingError> {
        let value = self.int(field)?;
        Ok(if value == 0 { None } else { Some(value) })
    }

    pub fn float(&self, field: Field) -> Result<f64, MappingError> {
        match self.value(field) {
            None => Ok(0.0),
            Some(value @ Value::Number(n)) => {
                n.as_f64().ok_or_else(|| self.invalid(field, "float", value))
            }
            Some(value @ Value::String(s)) => s
                .trim()
                .parse()
                .map_err(|_| self.invalid(field, "float", value)),
            Some(other) => Err(self.invalid(field, "float", other)),
        }
    }

    pub fn bool_or(&self, field: Field, default: bool) -> Result<bool, MappingError> {
        match self.value(field) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(value @ Value::String(s)) => match s.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(self.invalid(field, "bool", value)),
            },
            Some(other) => Err(self.invalid(field, "bool", other)),
        }
    }

    /// Reader for the single block of a zero-or-one list attribute
    pub fn option_list(&self, field: Field) -> Result<Option<BlockReader<'a>>, MappingError> {
        let path = self.field_path(field);
        let block = from_option_list(self.block.get(field.as_str()), &path)?;
        Ok(block.map(|block| BlockReader::new(block, format!("{}.0", path))))
    }
}

// ============================================================================
// RULE GROUPS
// ============================================================================

/// The three mutually exclusive rule groups of a rules block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleGroup {
    EntityVerification,
    System,
    Threshold,
}

impl RuleGroup {
    pub const ALL: [RuleGroup; 3] = [
        RuleGroup::EntityVerification,
        RuleGroup::System,
        RuleGroup::Threshold,
    ];

    pub fn field(&self) -> Field {
        match self {
            RuleGroup::EntityVerification => Field::EntityVerification,
            RuleGroup::System => Field::System,
            RuleGroup::Threshold => Field::Threshold,
        }
    }

    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleGroup::EntityVerification => RuleType::EntityVerification,
            RuleGroup::System => RuleType::System,
            RuleGroup::Threshold => RuleType::Threshold,
        }
    }

    pub fn from_rule_type(rule_type: RuleType) -> Self {
        match rule_type {
            RuleType::EntityVerification => RuleGroup::EntityVerification,
            RuleType::System => RuleGroup::System,
            RuleType::Threshold => RuleGroup::Threshold,
        }
    }
}
