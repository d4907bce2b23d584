//! Client configuration.
//!
//! Everything lives in an explicit [`ClientConfig`] value; nothing is read from the
//! environment after the client is built.

use crate::client::poll::{PollPolicy, DEFAULT_POLL_DEADLINE, DEFAULT_POLL_INTERVAL};
use crate::metadata::DEFAULT_LOGS_BASE_URL;
use crate::transport::Timeouts;
use crate::{Error, ErrorContext, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub organization: Option<String>,
    pub project: Option<String>,
    pub timeouts: Timeouts,
    pub poll: PollPolicy,
    pub logs_base_url: String,
    pub proxy_url: Option<String>,
    /// Check decoded output against the request's schema before handing it to the caller.
    pub validate_output: bool,
}

// Keeps the key out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("timeouts", &self.timeouts)
            .field("poll", &self.poll)
            .field("logs_base_url", &self.logs_base_url)
            .field("proxy_url", &self.proxy_url)
            .field("validate_output", &self.validate_output)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            organization: None,
            project: None,
            timeouts: Timeouts::default(),
            poll: PollPolicy::default(),
            logs_base_url: DEFAULT_LOGS_BASE_URL.to_string(),
            proxy_url: None,
            validate_output: true,
        }
    }

    /// Read configuration from the environment.
    ///
    /// - `OPENAI_API_KEY` (required)
    /// - `OPENAI_BASE_URL`, `OPENAI_ORGANIZATION`, `OPENAI_PROJECT`
    /// - `AI_RESPONSES_CREATE_TIMEOUT_SECS` (default 300)
    /// - `AI_RESPONSES_GET_TIMEOUT_SECS` (default 30)
    /// - `AI_RESPONSES_POLL_INTERVAL_MS` (default 2000)
    /// - `AI_RESPONSES_POLL_DEADLINE_SECS` (default 300, zero or negative = poll forever)
    /// - `AI_RESPONSES_LOGS_URL`
    /// - `AI_PROXY_URL`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let number = |key: &str| non_empty(key).and_then(|s| s.trim().parse::<u64>().ok());

        let api_key = non_empty("OPENAI_API_KEY").ok_or_else(|| {
            Error::configuration_with_context(
                "API key required",
                ErrorContext::new()
                    .with_operation("load_config")
                    .with_details("set OPENAI_API_KEY"),
            )
        })?;

        let mut cfg = Self::new(api_key);
        if let Some(url) = non_empty("OPENAI_BASE_URL") {
            cfg.base_url = url;
        }
        cfg.organization = non_empty("OPENAI_ORGANIZATION");
        cfg.project = non_empty("OPENAI_PROJECT");
        if let Some(secs) = number("AI_RESPONSES_CREATE_TIMEOUT_SECS") {
            cfg.timeouts.create_response = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = number("AI_RESPONSES_GET_TIMEOUT_SECS") {
            cfg.timeouts.get_response = Duration::from_secs(secs.max(1));
        }
        let interval = number("AI_RESPONSES_POLL_INTERVAL_MS")
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL);
        // Zero or negative deadline: poll forever.
        let deadline = non_empty("AI_RESPONSES_POLL_DEADLINE_SECS")
            .and_then(|s| s.trim().parse::<i64>().ok());
        cfg.poll = match deadline {
            Some(secs) if secs <= 0 => PollPolicy::forever(interval),
            Some(secs) => PollPolicy::new(interval, Duration::from_secs(secs.unsigned_abs())),
            None => PollPolicy::new(interval, DEFAULT_POLL_DEADLINE),
        };
        if let Some(url) = non_empty("AI_RESPONSES_LOGS_URL") {
            cfg.logs_base_url = url;
        }
        cfg.proxy_url = non_empty("AI_PROXY_URL");

        Ok(cfg)
    }

    /// Base URL without trailing slash, validated.
    pub(crate) fn normalized_base_url(&self) -> Result<String> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        url::Url::parse(trimmed).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid base URL: {}", e),
                ErrorContext::new()
                    .with_operation("build_client")
                    .with_url(self.base_url.clone()),
            )
        })?;
        Ok(trimmed.to_string())
    }
}
