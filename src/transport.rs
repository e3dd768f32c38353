//! HTTP transport boundary.
//!
//! Probes never talk to `reqwest` directly; they build a `ProbeRequest`
//! and hand it to a `Transport`. The default implementation wraps a
//! shared `reqwest::Client` with a fixed per-call timeout. Tests swap
//! in a scripted transport.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Per-call timeout for every probe request, in seconds.
pub const PROBE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One outbound probe call, fully described.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ProbeRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Status code plus body text. Probes only ever look at these two
/// fields; bodies that are not JSON are tolerated downstream.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, request: ProbeRequest) -> Result<TransportResponse, TransportError>;
}

/// Default transport backed by `reqwest`.
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, request: ProbeRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let resp = builder.timeout(self.timeout).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let get = ProbeRequest::get("https://example.com/a").header("x-key", "v");
        assert_eq!(get.method, Method::Get);
        assert!(get.body.is_none());
        assert_eq!(get.headers, vec![("x-key".to_string(), "v".to_string())]);

        let post = ProbeRequest::post("https://example.com/b", "{}");
        assert_eq!(post.method, Method::Post);
        assert_eq!(post.body.as_deref(), Some("{}"));
    }
}
