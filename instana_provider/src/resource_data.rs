// src/resource_data.rs
//! Configuration tree of a single managed resource

use crate::schema::fields::Field;
use serde_json::Value;

/// One level of the configuration tree
pub type Block = serde_json::Map<String, Value>;

/// Declared state of a resource plus its identity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: String,
    attributes: Block,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_attributes(attributes: Block) -> Self {
        Self {
            id: String::new(),
            attributes,
        }
    }

    /// Build from a JSON object; any other value yields an empty tree
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(attributes) => Self::from_attributes(attributes),
            _ => Self::default(),
        }
    }

    /// Identity of the resource, empty when not yet created
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    pub fn attributes(&self) -> &Block {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Block {
        &mut self.attributes
    }

    pub fn get(&self, field: Field) -> Option<&Value> {
        self.attributes.get(field.as_str())
    }

    pub fn set(&mut self, field: Field, value: impl Into<Value>) {
        self.attributes.insert(field.as_str().to_string(), value.into());
    }

    /// Get a nested value by dot path; numeric segments index lists
    ///
    /// `rules.0.threshold.0.metric_name` addresses the metric name of the
    /// first threshold group of the first rules block.
    pub fn get_by_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.attributes.get(parts.next()?)?;

        for part in parts {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(current)
    }

    /// Copy of the tree as a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(self.attributes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_by_path_walks_blocks_and_lists() {
        let data = ResourceData::from_json(json!({
            "name": "name",
            "rules": [{
                "threshold": [{ "metric_name": "metric", "window": 60000 }]
            }]
        }));

        assert_eq!(data.get_by_path("name"), Some(&json!("name")));
        assert_eq!(
            data.get_by_path("rules.0.threshold.0.metric_name"),
            Some(&json!("metric"))
        );
        assert_eq!(data.get_by_path("rules.1.threshold"), None);
        assert_eq!(data.get_by_path("rules.x"), None);
        assert_eq!(data.get_by_path("name.length"), None);
    }

    #[test]
    fn test_identity_is_independent_of_attributes() {
        let mut data = ResourceData::new();
        assert_eq!(data.id(), "");

        data.set_id("abc");
        data.set(Field::Name, "name");
        assert_eq!(data.id(), "abc");
        assert_eq!(data.get(Field::Name), Some(&json!("name")));

        data.clear_id();
        assert_eq!(data.id(), "");
        assert_eq!(data.attributes().len(), 1);
    }
}
