//! HTTP transport seam.
//!
//! The dispatcher builds an [`HttpRequest`] and hands it to a [`Transport`].
//! [`ReqwestTransport`] is the production implementation; tests substitute
//! their own.

use std::future::Future;
use std::time::Duration;

use reqwest::header::HeaderMap;
use tracing::trace;

use crate::error::TransportError;

pub use reqwest::header;
pub use reqwest::{Method, StatusCode};

/// A fully-resolved outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Final header set.
    pub headers: HeaderMap,
    /// Pre-serialized body.
    pub body: Option<String>,
}

/// A received response, body fully buffered.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Something that can carry an [`HttpRequest`] to the backend.
pub trait Transport: Send + Sync {
    /// Sends the request and buffers the response.
    ///
    /// Any HTTP status is a successful send; only failures to complete the
    /// exchange are errors.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("centro-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(method, &url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        trace!(url = %url, status = status.as_u16(), bytes = body.len(), "response received");
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_builds_with_timeout() {
        assert!(ReqwestTransport::new(Duration::from_secs(1)).is_ok());
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let transport = ReqwestTransport::new(Duration::from_millis(200)).expect("client");
        let request = HttpRequest {
            method: Method::GET,
            // Port 9 (discard) on loopback is reliably closed.
            url: "http://127.0.0.1:9/api/v1/stats".to_string(),
            headers: HeaderMap::new(),
            body: None,
        };

        let result = transport.send(request).await;
        assert!(result.is_err());
    }
}
