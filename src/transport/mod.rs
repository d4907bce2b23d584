//! HTTP transport: authentication, per-operation timeouts and body decoding.

pub mod encoding;
pub mod http;

pub use encoding::{decode_body, ContentEncoding};
pub use http::{HttpTransport, Operation, Timeouts};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    #[error("HTTP error during {operation} ({url}): {source}")]
    Http {
        operation: Operation,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode {encoding} body during {operation} ({url}): {source} (raw: {raw_excerpt})")]
    Body {
        operation: Operation,
        url: String,
        encoding: String,
        /// Leading bytes of the undecodable body, lossily rendered as text.
        raw_excerpt: String,
        #[source]
        source: std::io::Error,
    },

    #[error("API error during {operation} ({url}): HTTP {status}: {body}")]
    Status {
        operation: Operation,
        url: String,
        status: u16,
        body: String,
    },
}

/// Longest raw-body prefix kept on [`TransportError::Body`].
pub const RAW_EXCERPT_LIMIT: usize = 512;

/// Lossy text of at most [`RAW_EXCERPT_LIMIT`] leading bytes of `raw`.
pub fn raw_excerpt(raw: &[u8]) -> String {
    let cut = &raw[..raw.len().min(RAW_EXCERPT_LIMIT)];
    let mut text = String::from_utf8_lossy(cut).into_owned();
    if raw.len() > RAW_EXCERPT_LIMIT {
        text.push_str("...");
    }
    text
}

impl TransportError {
    pub fn url(&self) -> Option<&str> {
        match self {
            TransportError::Client(_) => None,
            TransportError::Http { url, .. }
            | TransportError::Body { url, .. }
            | TransportError::Status { url, .. } => Some(url),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_excerpt_truncates_long_bodies() {
        assert_eq!(raw_excerpt(b"not gzip"), "not gzip");

        let long = vec![b'a'; RAW_EXCERPT_LIMIT + 10];
        let excerpt = raw_excerpt(&long);
        assert_eq!(excerpt.len(), RAW_EXCERPT_LIMIT + 3);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn test_body_error_shows_excerpt() {
        let err = TransportError::Body {
            operation: Operation::GetResponse,
            url: "http://x/responses/r".into(),
            encoding: "gzip".into(),
            raw_excerpt: raw_excerpt(b"plain text"),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "invalid gzip header"),
        };
        let msg = err.to_string();
        assert!(msg.contains("raw: plain text"));
        assert_eq!(err.url(), Some("http://x/responses/r"));
    }
}
