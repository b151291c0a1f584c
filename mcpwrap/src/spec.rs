//! Command specification types.
//!
//! A [`CommandSpec`] is the emission-agnostic description of one command:
//! its name, description and parameter schema.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Specification for one exposed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Command name, identical to the wrapped callable's name.
    pub name: String,

    /// Resolved description; never empty.
    pub description: String,

    /// Parameter schema in declaration order.
    pub parameters: IndexMap<String, SchemaEntry>,

    /// Parameters the callable accepts only by position, in signature order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positional_only: Vec<String>,
}

impl CommandSpec {
    /// Names of the parameters that must be supplied, in declaration order.
    pub fn required(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|(_, entry)| entry.required)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// JSON Schema object describing the command's input.
    pub fn input_schema(&self) -> Map<String, Value> {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|(name, entry)| (name.clone(), entry.to_schema()))
            .collect();

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert("required".to_string(), json!(self.required()));
        schema
    }
}

/// Schema entry for a single parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntry {
    /// Normalized type tag.
    #[serde(rename = "type")]
    pub tag: SchemaTag,

    /// Whether the caller must supply the parameter.
    pub required: bool,
}

impl SchemaEntry {
    /// Convert to a JSON Schema property.
    pub fn to_schema(&self) -> Value {
        json!({ "type": self.tag.as_str() })
    }
}

/// Primitive schema type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaTag {
    Integer,
    Number,
    String,
    Boolean,
    Array,
    Object,
}

impl SchemaTag {
    /// JSON Schema type string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> CommandSpec {
        let mut parameters = IndexMap::new();
        parameters.insert(
            "seq".to_string(),
            SchemaEntry {
                tag: SchemaTag::Array,
                required: true,
            },
        );
        parameters.insert(
            "k".to_string(),
            SchemaEntry {
                tag: SchemaTag::Integer,
                required: false,
            },
        );
        parameters.insert(
            "label".to_string(),
            SchemaEntry {
                tag: SchemaTag::String,
                required: true,
            },
        );
        CommandSpec {
            name: "sample".to_string(),
            description: "Pick k items.".to_string(),
            parameters,
            positional_only: Vec::new(),
        }
    }

    #[test]
    fn test_required_follows_declaration_order() {
        assert_eq!(sample().required(), vec!["seq", "label"]);
    }

    #[test]
    fn test_input_schema_shape() {
        let schema = Value::Object(sample().input_schema());
        assert_eq!(
            schema,
            json!({
                "type": "object",
                "properties": {
                    "seq": {"type": "array"},
                    "k": {"type": "integer"},
                    "label": {"type": "string"}
                },
                "required": ["seq", "label"]
            })
        );
    }

    #[test]
    fn test_properties_keep_declaration_order() {
        let text = serde_json::to_string(&sample().input_schema()).unwrap();
        let seq = text.find("\"seq\"").unwrap();
        let k = text.find("\"k\"").unwrap();
        let label = text.find("\"label\"").unwrap();
        assert!(seq < k && k < label, "unexpected order in {text}");
    }
}
