use crate::transport::encoding::{decode_body, ContentEncoding, ACCEPT_ENCODING};
use crate::transport::{raw_excerpt, TransportError};
use bytes::Bytes;
use reqwest::header::{ACCEPT_ENCODING as ACCEPT_ENCODING_HEADER, CONTENT_ENCODING, CONTENT_TYPE};
use reqwest::{Method, Proxy};
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

/// Class of HTTP call. Each class has its own timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `POST /responses`. Generation may take minutes.
    CreateResponse,
    /// `GET /responses/{id}`. A cheap metadata read.
    GetResponse,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateResponse => "create_response",
            Operation::GetResponse => "get_response",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-operation request timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub create_response: Duration,
    pub get_response: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            create_response: Duration::from_secs(300),
            get_response: Duration::from_secs(30),
        }
    }
}

impl Timeouts {
    pub fn for_operation(&self, op: Operation) -> Duration {
        match op {
            Operation::CreateResponse => self.create_response,
            Operation::GetResponse => self.get_response,
        }
    }
}

/// Authenticated HTTP transport for the vendor API.
pub struct HttpTransport {
    client: reqwest::Client,
    api_key: String,
    organization: Option<String>,
    project: Option<String>,
    timeouts: Timeouts,
}

impl HttpTransport {
    pub fn new(api_key: impl Into<String>, timeouts: Timeouts) -> Result<Self, TransportError> {
        Self::with_proxy(api_key, timeouts, None)
    }

    pub fn with_proxy(
        api_key: impl Into<String>,
        timeouts: Timeouts,
        proxy_url: Option<&str>,
    ) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(proxy_url) = proxy_url {
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| TransportError::Client(format!("invalid proxy '{}': {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            organization: None,
            project: None,
            timeouts,
        })
    }

    /// Attach `OpenAI-Organization` / `OpenAI-Project` headers to every call.
    pub fn with_identity(mut self, organization: Option<String>, project: Option<String>) -> Self {
        self.organization = organization;
        self.project = project;
        self
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Send one request and return the decoded body of a 2xx response.
    ///
    /// The body is decoded per `Content-Encoding` before the status check so that
    /// error bodies are readable too.
    pub async fn send(
        &self,
        operation: Operation,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Bytes, TransportError> {
        let client_request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let mut req = self
            .client
            .request(method.clone(), url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeouts.for_operation(operation))
            .header(ACCEPT_ENCODING_HEADER, ACCEPT_ENCODING)
            .header("x-client-request-id", client_request_id.as_str());

        if let Some(org) = &self.organization {
            req = req.header("OpenAI-Organization", org);
        }
        if let Some(project) = &self.project {
            req = req.header("OpenAI-Project", project);
        }
        if let Some(body) = body {
            req = req.header(CONTENT_TYPE, "application/json").body(body);
        }

        debug!(
            operation = operation.as_str(),
            method = method.as_str(),
            url,
            client_request_id = client_request_id.as_str(),
            "sending request"
        );

        let resp = req.send().await.map_err(|e| TransportError::Http {
            operation,
            url: url.to_string(),
            source: e,
        })?;

        let status = resp.status();
        let encoding = ContentEncoding::from_header(
            resp.headers()
                .get(CONTENT_ENCODING)
                .and_then(|v| v.to_str().ok()),
        );
        let raw = resp.bytes().await.map_err(|e| TransportError::Http {
            operation,
            url: url.to_string(),
            source: e,
        })?;
        let decoded = decode_body(&encoding, &raw, url).map_err(|e| TransportError::Body {
            operation,
            url: url.to_string(),
            encoding: encoding.to_string(),
            raw_excerpt: raw_excerpt(&raw),
            source: e,
        })?;

        debug!(
            operation = operation.as_str(),
            url,
            http_status = status.as_u16(),
            encoding = encoding.as_str(),
            raw_len = raw.len(),
            body_len = decoded.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "received response"
        );

        if !status.is_success() {
            return Err(TransportError::Status {
                operation,
                url: url.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&decoded).into_owned(),
            });
        }

        Ok(Bytes::from(decoded))
    }
}
