//! Run metadata: the audit record (tokens, timing, model identity) of one job.

use crate::types::response::{JobResponse, JobStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default base of the human-navigable run log URL.
pub const DEFAULT_LOGS_BASE_URL: &str = "https://platform.openai.com/logs";

/// How a job was run. Built once per job, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub response_id: String,
    pub response_logs_url: String,
    /// Base model name, e.g. "gpt-5-mini"
    pub model: String,
    /// Snapshot date, e.g. "2025-08-07", or empty
    pub model_snapshot: String,
    pub status: JobStatus,
    /// As echoed by the vendor, e.g. "low"
    pub reasoning_effort: Option<String>,
    pub temperature: Option<f64>,

    pub tokens_in: u64,
    pub tokens_cached: u64,
    pub tokens_out: u64,
    pub tokens_reasoning: u64,
    pub tokens_total: u64,

    /// Epoch milliseconds
    pub started_at: i64,
    /// Epoch milliseconds
    pub finished_at: i64,
    /// Milliseconds
    pub elapsed: i64,
}

impl RunMetadata {
    /// Build metadata for a finished job, with `finished_at` = now.
    ///
    /// `started_at` is the caller's own start time; the vendor's `created_at` only has
    /// second precision.
    pub fn from_response(
        response: &JobResponse,
        started_at: DateTime<Utc>,
        logs_base_url: &str,
    ) -> Self {
        Self::from_response_at(response, started_at, Utc::now(), logs_base_url)
    }

    pub fn from_response_at(
        response: &JobResponse,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        logs_base_url: &str,
    ) -> Self {
        info!(
            response_id = response.id.as_str(),
            status = response.status.as_str(),
            "building run metadata"
        );

        let (model, model_snapshot) = parse_model_snapshot(&response.model);
        let usage = response.usage.clone().unwrap_or_default();
        let started_at = started_at.timestamp_millis();
        let finished_at = finished_at.timestamp_millis();

        Self {
            response_id: response.id.clone(),
            response_logs_url: logs_url(logs_base_url, &response.id),
            model,
            model_snapshot,
            status: response.status.clone(),
            reasoning_effort: response.reasoning.as_ref().and_then(|r| r.effort.clone()),
            temperature: response.temperature,
            tokens_in: usage.input_tokens,
            tokens_cached: usage.cached_tokens(),
            tokens_out: usage.output_tokens,
            tokens_reasoning: usage.reasoning_tokens(),
            tokens_total: usage.total_tokens,
            started_at,
            finished_at,
            elapsed: finished_at - started_at,
        }
    }
}

pub fn logs_url(base: &str, response_id: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), response_id)
}

/// Split a model string into `(base, snapshot)`.
///
/// ```
/// use ai_lib_responses::metadata::parse_model_snapshot;
///
/// assert_eq!(parse_model_snapshot("gpt-5-nano-2025-08-07"), ("gpt-5-nano".into(), "2025-08-07".into()));
/// assert_eq!(parse_model_snapshot("gpt-5-nano"), ("gpt-5-nano".into(), "".into()));
/// assert_eq!(parse_model_snapshot("gpt-5-nano-rc1"), ("gpt-5-nano-rc1".into(), "".into()));
/// ```
pub fn parse_model_snapshot(model: &str) -> (String, String) {
    let m = model.trim();

    // Fast path: "<base>-YYYY-MM-DD"
    if m.len() >= 11 && m.is_char_boundary(m.len() - 10) {
        let (head, tail) = m.split_at(m.len() - 10);
        if let Some(base) = head.strip_suffix('-') {
            if is_calendar_date(tail) {
                return (base.to_string(), tail.to_string());
            }
        }
    }

    // Fallback: the last dash-delimited segment alone is a date.
    if let Some(idx) = m.rfind('-') {
        let candidate = &m[idx + 1..];
        if candidate.len() == 10 && is_calendar_date(candidate) {
            return (m[..idx].to_string(), candidate.to_string());
        }
    }

    (m.to_string(), String::new())
}

/// Strict `YYYY-MM-DD` with a real calendar date.
fn is_calendar_date(s: &str) -> bool {
    let b = s.as_bytes();
    let shape_ok = b.len() == 10
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            _ => c.is_ascii_digit(),
        });
    shape_ok && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}
