//! HTTP transport seam.
//!
//! The handler never talks to the network directly. It hands a validated
//! [`OutboundRequest`] to an [`HttpTransport`] and receives a fully
//! buffered [`TransportResponse`]. [`ReqwestTransport`] is the production
//! implementation; tests inject scripted transports.

use std::time::Duration;

use http::HeaderMap;

use crate::error::HttpError;
use crate::request::OutboundRequest;

/// What came back from the remote server.
#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    pub status: u16,
    /// All response headers, message and content alike.
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Transport-level failures.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// A header was refused by the HTTP layer.
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    /// The request could not be completed.
    #[error("{0}")]
    Failed(String),
}

impl From<TransportError> for HttpError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::InvalidHeader(msg) => HttpError::InvalidEncoding(msg),
            TransportError::Failed(msg) => HttpError::RequestFailed(msg),
        }
    }
}

/// Sends one request and blocks until the full response is available.
///
/// Injected into the handler for testability.
pub trait HttpTransport: Send + Sync {
    fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError>;
}

/// [`HttpTransport`] backed by an async `reqwest::Client`.
///
/// Bridges the synchronous host call to the async client via
/// `tokio::task::block_in_place`, so it must run on a multi-thread tokio
/// runtime.
pub struct ReqwestTransport {
    client: reqwest::Client,
    runtime_handle: tokio::runtime::Handle,
}

impl ReqwestTransport {
    /// Create a transport with an optional per-request timeout.
    pub fn new(
        runtime_handle: tokio::runtime::Handle,
        timeout: Option<Duration>,
    ) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Failed(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            runtime_handle,
        })
    }

    async fn execute(
        client: reqwest::Client,
        request: OutboundRequest,
    ) -> Result<TransportResponse, TransportError> {
        let headers = request.wire_headers();
        let mut builder = client
            .request(request.method, request.url.as_str())
            .headers(headers);
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Failed(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Failed(format!("failed to read body: {e}")))?;

        Ok(TransportResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending http request");
        let client = self.client.clone();
        let handle = self.runtime_handle.clone();
        tokio::task::block_in_place(|| handle.block_on(Self::execute(client, request)))
    }
}
