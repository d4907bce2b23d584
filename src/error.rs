use crate::metadata::RunMetadata;
use crate::transport::TransportError;
use crate::types::response::JobStatus;
use std::time::Duration;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Operation that failed (e.g., "create_response", "decode_output")
    pub operation: Option<String>,
    /// Job the operation was working on, when known
    pub job_id: Option<String>,
    /// URL of the HTTP call involved, when any
    pub url: Option<String>,
    /// Additional context about the error (e.g., offending payload excerpt)
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Which document failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeTarget {
    /// The vendor's response envelope (a protocol problem).
    Envelope,
    /// The model's structured output text (the model ignored the schema instructions).
    Output,
}

impl std::fmt::Display for DecodeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeTarget::Envelope => f.write_str("response envelope"),
            DecodeTarget::Output => f.write_str("structured output"),
        }
    }
}

/// Unified error type for job submission, polling and output extraction.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Encode error: {source}{}", format_context(.context))]
    Encode {
        #[source]
        source: serde_json::Error,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Decode error ({target}): {message}{}", format_context(.context))]
    Decode {
        target: DecodeTarget,
        message: String,
        /// Raw text that failed to decode, kept verbatim for diagnosis.
        raw: String,
        context: ErrorContext,
        /// Run metadata of the job whose output failed to decode.
        metadata: Option<Box<RunMetadata>>,
    },

    #[error("Output violates the requested schema: {}{}", .violations.join("; "), format_context(.context))]
    SchemaViolation {
        violations: Vec<String>,
        raw: String,
        context: ErrorContext,
        metadata: Option<Box<RunMetadata>>,
    },

    #[error("Job {job_id} ended with status '{status}'{}", format_payload(.payload))]
    JobFailed {
        job_id: String,
        status: JobStatus,
        /// Vendor error payload, as returned.
        payload: Option<serde_json::Value>,
        /// Tokens and timing of the failed run, when the client built them.
        metadata: Option<Box<RunMetadata>>,
    },

    #[error("Polling job {job_id} timed out after {}ms (last status '{last_status}')", .waited.as_millis())]
    Timeout {
        job_id: String,
        waited: Duration,
        last_status: JobStatus,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {source}{}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: ErrorContext,
    },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref op) = ctx.operation {
        parts.push(format!("operation: {}", op));
    }
    if let Some(ref job_id) = ctx.job_id {
        parts.push(format!("job: {}", job_id));
    }
    if let Some(ref url) = ctx.url {
        parts.push(format!("url: {}", url));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn format_payload(payload: &Option<serde_json::Value>) -> String {
    match payload {
        Some(v) if !v.is_null() => format!(": {}", v),
        _ => String::new(),
    }
}

impl Error {
    pub fn encode(source: serde_json::Error, context: ErrorContext) -> Self {
        Error::Encode { source, context }
    }

    pub fn decode(
        target: DecodeTarget,
        message: impl Into<String>,
        raw: impl Into<String>,
        context: ErrorContext,
    ) -> Self {
        Error::Decode {
            target,
            message: message.into(),
            raw: raw.into(),
            context,
            metadata: None,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn configuration_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: message.into(),
            context,
        }
    }

    pub fn io(source: std::io::Error, context: ErrorContext) -> Self {
        Error::Io { source, context }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Encode { context, .. }
            | Error::Decode { context, .. }
            | Error::SchemaViolation { context, .. }
            | Error::Configuration { context, .. }
            | Error::Io { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Attach run metadata to job-level and output errors. Other variants are returned as-is.
    pub fn with_metadata(mut self, run: RunMetadata) -> Self {
        match &mut self {
            Error::Decode { metadata, .. }
            | Error::SchemaViolation { metadata, .. }
            | Error::JobFailed { metadata, .. } => *metadata = Some(Box::new(run)),
            _ => {}
        }
        self
    }

    /// Run metadata of the job, for errors raised after the job was identified.
    pub fn metadata(&self) -> Option<&RunMetadata> {
        match self {
            Error::Decode { metadata, .. }
            | Error::SchemaViolation { metadata, .. }
            | Error::JobFailed { metadata, .. } => metadata.as_deref(),
            _ => None,
        }
    }

    /// Job id the error relates to, if the job was ever identified.
    pub fn job_id(&self) -> Option<&str> {
        match self {
            Error::JobFailed { job_id, .. } | Error::Timeout { job_id, .. } => Some(job_id),
            other => other.context().and_then(|c| c.job_id.as_deref()),
        }
    }

    /// Terminal status for job-level errors: the vendor's failure status, or the
    /// local `timeout` pseudo-status.
    pub fn terminal_status(&self) -> Option<JobStatus> {
        match self {
            Error::JobFailed { status, .. } => Some(status.clone()),
            Error::Timeout { .. } => Some(JobStatus::Timeout),
            _ => None,
        }
    }

    /// Whether resubmitting the same request may succeed.
    ///
    /// Job failures and local timeouts are retryable by resubmission. Encode, decode and
    /// schema errors are logic errors and are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::JobFailed { .. } | Error::Timeout { .. })
    }
}
