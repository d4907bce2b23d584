//! Strict object schemas and the `text.format` request block.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Build a strict JSON Schema object from a property map.
///
/// - `properties` = the given map
/// - `required` = every property key, sorted
/// - `additionalProperties` = false
///
/// `None` or an empty map yields a valid object schema with no required fields.
pub fn strict_object(properties: Option<Map<String, Value>>) -> Value {
    let properties = properties.unwrap_or_default();
    let mut required: Vec<String> = properties.keys().cloned().collect();
    required.sort();

    json!({
        "type": "object",
        "properties": properties,
        "additionalProperties": false,
        "required": required,
    })
}

/// Convenience for callers holding the property map as a JSON value.
///
/// Anything other than an object is treated as "no properties".
pub fn strict_object_from_value(properties: Value) -> Value {
    match properties {
        Value::Object(map) => strict_object(Some(map)),
        _ => strict_object(None),
    }
}

/// Output formatting options (`"text": {...}` in the request).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOptions {
    pub format: TextFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<Verbosity>,
}

impl TextOptions {
    pub fn plain(verbosity: Option<Verbosity>) -> Self {
        Self {
            format: TextFormat::Text,
            verbosity,
        }
    }

    pub fn json_object() -> Self {
        Self {
            format: TextFormat::JsonObject,
            verbosity: None,
        }
    }

    /// `json_schema` format. `name` must match `^[a-zA-Z0-9_-]+$` on the vendor side.
    pub fn json_schema(name: impl Into<String>, schema: Value, strict: bool) -> Self {
        Self {
            format: TextFormat::JsonSchema {
                name: name.into(),
                schema,
                strict: Some(strict),
            },
            verbosity: None,
        }
    }

    /// Schema the output must satisfy, when one was requested.
    pub fn schema(&self) -> Option<&Value> {
        match &self.format {
            TextFormat::JsonSchema { schema, .. } => Some(schema),
            _ => None,
        }
    }
}

impl Default for TextOptions {
    fn default() -> Self {
        Self::plain(None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextFormat {
    Text,
    JsonObject,
    JsonSchema {
        name: String,
        schema: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        strict: Option<bool>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Low,
    Medium,
    High,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(keys: &[&str]) -> Map<String, Value> {
        keys.iter()
            .map(|k| (k.to_string(), json!({"type": "string"})))
            .collect()
    }

    #[test]
    fn test_required_is_sorted_keys() {
        let schema = strict_object(Some(props(&["totals", "items", "currency"])));
        assert_eq!(schema["required"], json!(["currency", "items", "totals"]));
        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(schema["type"], json!("object"));
        assert_eq!(schema["properties"]["items"], json!({"type": "string"}));
    }

    #[test]
    fn test_empty_input_is_valid_empty_object() {
        let expected = json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false,
            "required": [],
        });
        assert_eq!(strict_object(None), expected);
        assert_eq!(strict_object(Some(Map::new())), expected);
        assert_eq!(strict_object_from_value(Value::Null), expected);
    }

    #[test]
    fn test_output_is_byte_identical_across_calls() {
        let a = serde_json::to_string(&strict_object(Some(props(&["b", "a", "c"])))).unwrap();
        let b = serde_json::to_string(&strict_object(Some(props(&["c", "b", "a"])))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_text_format_wire_shapes() {
        let schema = strict_object(Some(props(&["response"])));
        let opts = TextOptions::json_schema("structured_output", schema.clone(), true);
        assert_eq!(opts.schema(), Some(&schema));
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({"format": {
                "type": "json_schema",
                "name": "structured_output",
                "schema": schema,
                "strict": true
            }})
        );
        assert_eq!(
            serde_json::to_value(TextOptions::json_object()).unwrap(),
            json!({"format": {"type": "json_object"}})
        );
        assert_eq!(
            serde_json::to_value(TextOptions::plain(Some(Verbosity::Low))).unwrap(),
            json!({"format": {"type": "text"}, "verbosity": "low"})
        );
    }
}
