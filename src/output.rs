//! Extraction of the model's text output from a finished job.

use crate::error::DecodeTarget;
use crate::structured::OutputValidator;
use crate::types::response::JobResponse;
use crate::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;

/// Concatenate every non-empty `output_text` fragment of every `message` item, in order,
/// with no separator. Non-message items (reasoning, tool calls) are skipped.
pub fn extract_text(response: &JobResponse) -> String {
    let mut text = String::new();
    for item in response.output.iter().filter(|i| i.is_message()) {
        for part in item.content.iter().filter(|c| c.is_output_text()) {
            if let Some(t) = part.text.as_deref() {
                text.push_str(t);
            }
        }
    }
    text
}

/// Decode the model's output text into `T`.
///
/// The model is told to emit exactly one JSON object matching the schema, so a failure
/// here is the model breaking its instructions, reported as [`DecodeTarget::Output`].
pub fn decode_output<T: DeserializeOwned>(text: &str, job_id: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| {
        Error::decode(
            DecodeTarget::Output,
            e.to_string(),
            text,
            ErrorContext::new()
                .with_operation("decode_output")
                .with_job_id(job_id),
        )
    })
}

/// Like [`decode_output`], but first checks the JSON against the enforced schema.
pub fn decode_validated_output<T: DeserializeOwned>(
    text: &str,
    job_id: &str,
    validator: &OutputValidator,
) -> Result<T> {
    let value: serde_json::Value = decode_output(text, job_id)?;
    if let Err(violations) = validator.validate(&value) {
        return Err(Error::SchemaViolation {
            violations: violations.iter().map(|v| v.to_string()).collect(),
            raw: text.to_string(),
            context: ErrorContext::new()
                .with_operation("validate_output")
                .with_job_id(job_id),
            metadata: None,
        });
    }
    serde_json::from_value(value).map_err(|e| {
        Error::decode(
            DecodeTarget::Output,
            e.to_string(),
            text,
            ErrorContext::new()
                .with_operation("decode_output")
                .with_job_id(job_id),
        )
    })
}
