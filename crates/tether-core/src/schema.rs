//! Closed-world JSON Schema construction.
//!
//! Tool parameter schemas are the primary input-sanitization mechanism:
//! every object node is closed with `additionalProperties: false`, and
//! `enum` constraints scope choices (skill names, source ids, knowledge
//! base ids) to exactly what is contextually valid for the current turn.

use serde_json::{Map, Value, json};

/// Builder for a closed object schema.
#[derive(Debug, Default, Clone)]
pub struct ObjectSchema {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required string property.
    pub fn string(mut self, name: &str, description: &str) -> Self {
        self.properties.insert(
            name.to_string(),
            json!({ "type": "string", "description": description }),
        );
        self.required.push(name.to_string());
        self
    }

    /// Optional string property.
    pub fn optional_string(mut self, name: &str, description: &str) -> Self {
        self.properties.insert(
            name.to_string(),
            json!({ "type": "string", "description": description }),
        );
        self
    }

    /// Required string property constrained to an enumeration.
    pub fn string_enum<I, S>(mut self, name: &str, description: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        self.properties.insert(
            name.to_string(),
            json!({ "type": "string", "description": description, "enum": values }),
        );
        self.required.push(name.to_string());
        self
    }

    /// Optional integer property with inclusive bounds.
    pub fn optional_integer(
        mut self,
        name: &str,
        description: &str,
        minimum: i64,
        maximum: Option<i64>,
    ) -> Self {
        let mut node = Map::new();
        node.insert("type".to_string(), json!("integer"));
        node.insert("description".to_string(), json!(description));
        node.insert("minimum".to_string(), json!(minimum));
        if let Some(maximum) = maximum {
            node.insert("maximum".to_string(), json!(maximum));
        }
        self.properties.insert(name.to_string(), Value::Object(node));
        self
    }

    /// Required property with a caller-supplied schema node. The node is
    /// closed recursively if it is an object schema.
    pub fn property(mut self, name: &str, node: Value) -> Self {
        self.properties.insert(name.to_string(), close_object_nodes(node));
        self.required.push(name.to_string());
        self
    }

    /// Finish the schema. The resulting object node is always closed.
    pub fn build(self) -> Value {
        json!({
            "type": "object",
            "properties": Value::Object(self.properties),
            "required": self.required,
            "additionalProperties": false,
        })
    }
}

/// Recursively set `additionalProperties: false` on every object node of a
/// foreign schema (e.g. one declared by a remote MCP tool).
pub fn close_object_nodes(schema: Value) -> Value {
    match schema {
        Value::Object(mut node) => {
            let is_object_schema = node.get("type").and_then(Value::as_str) == Some("object")
                || node.contains_key("properties");
            if is_object_schema {
                node.entry("additionalProperties").or_insert(json!(false));
            }
            let node = node
                .into_iter()
                .map(|(key, value)| {
                    // Enum member lists and const values are data, not schema.
                    if key == "enum" || key == "const" {
                        (key, value)
                    } else {
                        (key, close_object_nodes(value))
                    }
                })
                .collect();
            Value::Object(node)
        }
        Value::Array(items) => {
            Value::Array(items.into_iter().map(close_object_nodes).collect())
        }
        other => other,
    }
}

/// Walk a schema and verify every object node is closed. Used by tests to
/// hold the closed-world invariant for every tool in the catalogue.
pub fn all_object_nodes_closed(schema: &Value) -> bool {
    match schema {
        Value::Object(node) => {
            let is_object_schema = node.get("type").and_then(Value::as_str) == Some("object")
                || node.contains_key("properties");
            if is_object_schema
                && node.get("additionalProperties") != Some(&Value::Bool(false))
            {
                return false;
            }
            node.iter()
                .filter(|(key, _)| *key != "enum" && *key != "const")
                .all(|(_, value)| all_object_nodes_closed(value))
        }
        Value::Array(items) => items.iter().all(all_object_nodes_closed),
        _ => true,
    }
}
