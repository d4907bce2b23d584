use crate::client::config::ClientConfig;
use crate::client::core::ResponsesClient;
use crate::client::poll::PollPolicy;
use crate::Result;
use std::time::Duration;

/// Builder for [`ResponsesClient`].
///
/// Anything not set explicitly comes from the environment (see [`ClientConfig::from_env`]),
/// then from the built-in defaults.
#[derive(Debug, Default)]
pub struct ResponsesClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    organization: Option<String>,
    project: Option<String>,
    create_timeout: Option<Duration>,
    get_timeout: Option<Duration>,
    poll: Option<PollPolicy>,
    logs_base_url: Option<String>,
    proxy_url: Option<String>,
    validate_output: Option<bool>,
}

impl ResponsesClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the API base URL (e.g. a mock server in tests).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Timeout for `POST /responses`.
    pub fn create_timeout(mut self, timeout: Duration) -> Self {
        self.create_timeout = Some(timeout);
        self
    }

    /// Timeout for `GET /responses/{id}`.
    pub fn get_timeout(mut self, timeout: Duration) -> Self {
        self.get_timeout = Some(timeout);
        self
    }

    /// Poll every `interval`, giving up after `deadline` (zero polls forever).
    pub fn poll(mut self, interval: Duration, deadline: Duration) -> Self {
        self.poll = Some(PollPolicy::new(interval, deadline));
        self
    }

    pub fn logs_base_url(mut self, url: impl Into<String>) -> Self {
        self.logs_base_url = Some(url.into());
        self
    }

    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    /// Toggle schema validation of decoded output. Enabled by default.
    pub fn validate_output(mut self, enable: bool) -> Self {
        self.validate_output = Some(enable);
        self
    }

    /// Resolve the final configuration without building a client.
    pub fn into_config(self) -> Result<ClientConfig> {
        let api_key = self.api_key.clone();
        let mut cfg = ClientConfig::from_lookup(|key| match key {
            "OPENAI_API_KEY" if api_key.is_some() => api_key.clone(),
            _ => std::env::var(key).ok(),
        })?;

        if let Some(url) = self.base_url {
            cfg.base_url = url;
        }
        if self.organization.is_some() {
            cfg.organization = self.organization;
        }
        if self.project.is_some() {
            cfg.project = self.project;
        }
        if let Some(t) = self.create_timeout {
            cfg.timeouts.create_response = t;
        }
        if let Some(t) = self.get_timeout {
            cfg.timeouts.get_response = t;
        }
        if let Some(poll) = self.poll {
            cfg.poll = poll;
        }
        if let Some(url) = self.logs_base_url {
            cfg.logs_base_url = url;
        }
        if self.proxy_url.is_some() {
            cfg.proxy_url = self.proxy_url;
        }
        if let Some(v) = self.validate_output {
            cfg.validate_output = v;
        }
        Ok(cfg)
    }

    pub fn build(self) -> Result<ResponsesClient> {
        ResponsesClient::with_config(self.into_config()?)
    }
}
