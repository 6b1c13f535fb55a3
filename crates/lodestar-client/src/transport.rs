//! Transport seam: sends one request and hands back one raw response.
//!
//! The SDK never looks behind this trait. Connection pooling, TLS and any
//! socket-level retries belong to the implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::request::HttpRequest;

/// A response as received, before any decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// No response could be obtained.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// The connection could not be established or was dropped.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The transport gave up waiting for a response.
    #[error("request timed out")]
    Timeout,

    /// Any other transport-level failure.
    #[error("transport error: {0}")]
    Other(String),
}

/// Delivers a request and returns the response exactly once.
///
/// The returned future resolving is the completion handoff: it yields either
/// the raw response or the reason none was obtained.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError>;
}

/// Production transport backed by a pooled `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with the given per-request timeout
    /// (`Duration::ZERO` disables it).
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wraps an already configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        let (method, url, headers, body) = request.into_parts();

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        Ok(RawResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        assert!(RawResponse::new(200, Vec::new()).is_success());
        assert!(RawResponse::new(204, Vec::new()).is_success());
        assert!(!RawResponse::new(304, Vec::new()).is_success());
        assert!(!RawResponse::new(412, Vec::new()).is_success());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();
        // Nothing listens on the discard port.
        let request = crate::request::HttpRequestBuilder::get("http://127.0.0.1:9/unreachable")
            .build()
            .unwrap();
        let err = transport.send(request).await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::Connection(_) | TransportError::Timeout | TransportError::Other(_)
        ));
    }
}
