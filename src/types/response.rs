//! Response envelope returned by `POST /responses` and `GET /responses/{id}`.

use serde::{Deserialize, Serialize};

/// Job status as reported by the vendor, plus the local `timeout` pseudo-status.
///
/// An absent or empty status is kept as [`JobStatus::Unset`] and treated as completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    #[default]
    Unset,
    Queued,
    InProgress,
    Completed,
    Incomplete,
    Failed,
    Cancelled,
    Expired,
    /// Local deadline passed while polling. Never sent by the vendor.
    Timeout,
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Unset => "",
            JobStatus::Queued => "queued",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Incomplete => "incomplete",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
            JobStatus::Expired => "expired",
            JobStatus::Timeout => "timeout",
            JobStatus::Other(s) => s.as_str(),
        }
    }

    /// Job finished and its output may be extracted.
    pub fn is_terminal_success(&self) -> bool {
        matches!(
            self,
            JobStatus::Unset | JobStatus::Completed | JobStatus::Incomplete
        )
    }

    /// Job finished without usable output.
    pub fn is_terminal_failure(&self) -> bool {
        matches!(
            self,
            JobStatus::Failed | JobStatus::Cancelled | JobStatus::Expired
        )
    }

    pub fn is_terminal(&self) -> bool {
        self.is_terminal_success() || self.is_terminal_failure() || *self == JobStatus::Timeout
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        match s.trim() {
            "" => JobStatus::Unset,
            "queued" => JobStatus::Queued,
            "in_progress" => JobStatus::InProgress,
            "completed" => JobStatus::Completed,
            "incomplete" => JobStatus::Incomplete,
            "failed" => JobStatus::Failed,
            "cancelled" => JobStatus::Cancelled,
            "expired" => JobStatus::Expired,
            "timeout" => JobStatus::Timeout,
            _ => JobStatus::Other(s),
        }
    }
}

impl From<&str> for JobStatus {
    fn from(s: &str) -> Self {
        JobStatus::from(s.to_string())
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire-level job response. Only the fields used downstream are typed; unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    /// Epoch seconds. Too coarse for run timing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: JobStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub output: Vec<OutputItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningEcho>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<bool>,
    /// Opaque vendor error payload; only present on failure-class statuses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
}

impl JobResponse {
    /// Decode the opaque error payload into its common `{code, message}` shape.
    pub fn vendor_error(&self) -> Option<VendorError> {
        let raw = self.error.as_ref().filter(|v| !v.is_null())?;
        serde_json::from_value(raw.clone()).ok()
    }
}

/// Reasoning settings echoed back by the vendor. Kept as plain strings so that new
/// effort levels do not break envelope decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningEcho {
    #[serde(default)]
    pub effort: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Common shape of the vendor error payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One item of the `output` array: a message or some other event (reasoning, tool call).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<OutputContent>,
}

impl OutputItem {
    pub fn is_message(&self) -> bool {
        self.kind == "message"
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputContent {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub annotations: Vec<serde_json::Value>,
}

impl OutputContent {
    pub fn is_output_text(&self) -> bool {
        self.kind == "output_text"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens_details: Option<InputTokensDetails>,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens_details: Option<OutputTokensDetails>,
    #[serde(default)]
    pub total_tokens: u64,
}

impl Usage {
    pub fn cached_tokens(&self) -> u64 {
        self.input_tokens_details
            .as_ref()
            .map(|d| d.cached_tokens)
            .unwrap_or(0)
    }

    pub fn reasoning_tokens(&self) -> u64 {
        self.output_tokens_details
            .as_ref()
            .map(|d| d.reasoning_tokens)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTokensDetails {
    #[serde(default)]
    pub cached_tokens: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTokensDetails {
    #[serde(default)]
    pub reasoning_tokens: u64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_classification() {
        for s in ["", "completed", "incomplete"] {
            assert!(JobStatus::from(s).is_terminal_success(), "{s}");
        }
        for s in ["failed", "cancelled", "expired"] {
            assert!(JobStatus::from(s).is_terminal_failure(), "{s}");
        }
        for s in ["in_progress", "queued", "something_new"] {
            assert!(!JobStatus::from(s).is_terminal(), "{s}");
        }
        assert!(JobStatus::Timeout.is_terminal());
        assert_eq!(
            JobStatus::from("something_new"),
            JobStatus::Other("something_new".into())
        );
    }

    #[test]
    fn test_envelope_tolerates_missing_and_null_fields() {
        let resp: JobResponse = serde_json::from_value(json!({
            "id": "resp_1",
            "model": "gpt-5-mini-2025-08-07",
            "output": null,
            "error": null,
            "reasoning": {"effort": "low", "summary": null}
        }))
        .unwrap();
        assert_eq!(resp.status, JobStatus::Unset);
        assert!(resp.output.is_empty());
        assert!(resp.usage.is_none());
        assert!(resp.vendor_error().is_none());
    }

    #[test]
    fn test_null_identity_fields_decode_as_empty() {
        let resp: JobResponse = serde_json::from_value(json!({
            "id": null,
            "status": null,
            "model": null,
            "output": [
                {"type": null, "content": [{"type": null, "text": "ignored"}]}
            ]
        }))
        .unwrap();
        assert_eq!(resp.id, "");
        assert_eq!(resp.status, JobStatus::Unset);
        assert!(resp.status.is_terminal_success());
        assert_eq!(resp.model, "");
        assert_eq!(resp.output.len(), 1);
        assert!(!resp.output[0].is_message());
        assert!(!resp.output[0].content[0].is_output_text());
    }

    #[test]
    fn test_vendor_error_is_decoded_on_demand() {
        let resp: JobResponse = serde_json::from_value(json!({
            "id": "resp_2",
            "status": "failed",
            "error": {"code": "server_error", "message": "boom"}
        }))
        .unwrap();
        assert_eq!(resp.status, JobStatus::Failed);
        let err = resp.vendor_error().unwrap();
        assert_eq!(err.code.as_deref(), Some("server_error"));
        assert_eq!(err.message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_usage_details_default_to_zero() {
        let usage: Usage =
            serde_json::from_value(json!({"input_tokens": 10, "output_tokens": 2, "total_tokens": 12}))
                .unwrap();
        assert_eq!(usage.cached_tokens(), 0);
        assert_eq!(usage.reasoning_tokens(), 0);
    }
}
