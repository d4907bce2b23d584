use crate::client::builder::ResponsesClientBuilder;
use crate::client::config::ClientConfig;
use crate::client::poll::{job_failed, poll_to_terminal, wait_for_completion, JobSource};
use crate::error::DecodeTarget;
use crate::metadata::RunMetadata;
use crate::output::extract_text;
use crate::transport::{HttpTransport, Operation};
use crate::types::request::JobRequest;
use crate::types::response::JobResponse;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use tracing::{debug, info};

/// Client for background jobs on the Responses API.
///
/// Holds credentials, timeouts and the poll policy; there is no process-wide state.
pub struct ResponsesClient {
    transport: HttpTransport,
    config: ClientConfig,
    base_url: String,
}

/// A job that reached a terminal-success status.
#[derive(Debug, Clone)]
pub struct CompletedJob {
    pub response: JobResponse,
    /// Concatenated output text.
    pub text: String,
    pub metadata: RunMetadata,
}

impl ResponsesClient {
    /// Client configured from the environment.
    pub fn new() -> Result<Self> {
        ResponsesClientBuilder::new().build()
    }

    pub fn builder() -> ResponsesClientBuilder {
        ResponsesClientBuilder::new()
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = config.normalized_base_url()?;
        let transport =
            HttpTransport::with_proxy(&config.api_key, config.timeouts, config.proxy_url.as_deref())?
                .with_identity(config.organization.clone(), config.project.clone());

        Ok(Self {
            transport,
            config,
            base_url,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submit a job with `background` and `store` forced on.
    ///
    /// The returned response may already be terminal; otherwise hand it to [`Self::wait`].
    pub async fn submit(&self, request: &JobRequest) -> Result<JobResponse> {
        let url = format!("{}/responses", self.base_url);
        let body = serde_json::to_vec(&request.to_payload()).map_err(|e| {
            Error::encode(
                e,
                ErrorContext::new()
                    .with_operation(Operation::CreateResponse.as_str())
                    .with_url(url.clone()),
            )
        })?;

        debug!(
            model = request.model.as_str(),
            payload_len = body.len(),
            "submitting job"
        );

        let bytes = self
            .transport
            .send(Operation::CreateResponse, Method::POST, &url, Some(body))
            .await?;
        let resp = decode_envelope(&bytes, Operation::CreateResponse, &url)?;

        info!(
            job_id = resp.id.as_str(),
            status = resp.status.as_str(),
            model = request.model.as_str(),
            effort = request.reasoning_effort.as_str(),
            "job submitted"
        );
        Ok(resp)
    }

    /// Fetch the current state of a job.
    pub async fn get(&self, job_id: &str) -> Result<JobResponse> {
        let url = format!("{}/responses/{}", self.base_url, job_id);
        let bytes = self
            .transport
            .send(Operation::GetResponse, Method::GET, &url, None)
            .await?;
        decode_envelope(&bytes, Operation::GetResponse, &url)
    }

    /// Poll `initial` until it is terminal, using the configured policy.
    pub async fn wait(&self, initial: JobResponse) -> Result<JobResponse> {
        wait_for_completion(self, initial, &self.config.poll).await
    }

    /// Submit, wait, then extract text and run metadata.
    ///
    /// A job that ends failed, cancelled or expired is reported as [`Error::JobFailed`]
    /// carrying the run metadata built from the failing response.
    pub async fn run(&self, request: &JobRequest) -> Result<CompletedJob> {
        let started_at = Utc::now();
        let initial = self.submit(request).await?;
        let response = poll_to_terminal(self, initial, &self.config.poll).await?;

        let metadata = RunMetadata::from_response(&response, started_at, &self.config.logs_base_url);
        if response.status.is_terminal_failure() {
            return Err(job_failed(&response, Some(metadata)));
        }
        let text = extract_text(&response);

        info!(
            job_id = metadata.response_id.as_str(),
            status = metadata.status.as_str(),
            tokens_in = metadata.tokens_in,
            tokens_cached = metadata.tokens_cached,
            tokens_out = metadata.tokens_out,
            tokens_reasoning = metadata.tokens_reasoning,
            tokens_total = metadata.tokens_total,
            elapsed_ms = metadata.elapsed,
            "job finished"
        );
        debug!(
            job_id = metadata.response_id.as_str(),
            logs_url = metadata.response_logs_url.as_str(),
            "run log"
        );

        Ok(CompletedJob {
            response,
            text,
            metadata,
        })
    }
}

#[async_trait]
impl JobSource for ResponsesClient {
    async fn fetch_job(&self, job_id: &str) -> Result<JobResponse> {
        self.get(job_id).await
    }
}

fn decode_envelope(bytes: &[u8], operation: Operation, url: &str) -> Result<JobResponse> {
    serde_json::from_slice(bytes).map_err(|e| {
        Error::decode(
            DecodeTarget::Envelope,
            e.to_string(),
            String::from_utf8_lossy(bytes),
            ErrorContext::new()
                .with_operation(operation.as_str())
                .with_url(url),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_errors_keep_raw_body() {
        let err = decode_envelope(b"<html>bad gateway</html>", Operation::GetResponse, "http://x/responses/r")
            .unwrap_err();
        match err {
            Error::Decode { target, raw, context, .. } => {
                assert_eq!(target, DecodeTarget::Envelope);
                assert_eq!(raw, "<html>bad gateway</html>");
                assert_eq!(context.operation.as_deref(), Some("get_response"));
                assert_eq!(context.url.as_deref(), Some("http://x/responses/r"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_base_url_is_normalized() {
        let mut cfg = ClientConfig::new("k");
        cfg.base_url = "http://localhost:1234/v1/".into();
        let client = ResponsesClient::with_config(cfg).unwrap();
        assert_eq!(client.base_url, "http://localhost:1234/v1");
        assert_eq!(client.config().api_key, "k");
    }
}
