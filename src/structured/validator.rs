//! Output validator for structured responses.
//!
//! Checks the model's decoded output against the schema that was sent with the request.

use crate::structured::error::ValidationError;
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

/// Compiled validator for one output schema.
pub struct OutputValidator {
    schema: JSONSchema,
}

impl OutputValidator {
    /// Compile `schema`. Fails if the schema itself is malformed.
    pub fn new(schema: &Value) -> Result<Self, ValidationError> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(schema)
            .map_err(|e| {
                ValidationError::with_path(
                    format!("invalid schema: {}", e),
                    e.schema_path.to_string(),
                )
            })?;
        Ok(Self { schema: compiled })
    }

    /// Validate `data`, collecting every violation.
    pub fn validate(&self, data: &Value) -> Result<(), Vec<ValidationError>> {
        match self.schema.validate(data) {
            Ok(()) => Ok(()),
            Err(errors) => Err(errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        ValidationError::without_path(e.to_string())
                    } else {
                        ValidationError::with_path(e.to_string(), path)
                    }
                })
                .collect()),
        }
    }

    pub fn is_valid(&self, data: &Value) -> bool {
        self.schema.is_valid(data)
    }
}
