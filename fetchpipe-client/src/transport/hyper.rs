//! Hyper-based HTTP transport.
//!
//! This module provides [`HyperTransport`], the default [`Transport`] built
//! on hyper_util's legacy client.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::{TokioExecutor, TokioTimer};
use rustls::ClientConfig;
use tower_service::Service;

use super::Transport;
use super::body::TransportBody;
use super::connector::build_https_connector;
use crate::ClientError;

type HyperClient = Client<HttpsConnector<HttpConnector>, TransportBody>;

/// HTTP transport using hyper_util's legacy client.
///
/// Supports HTTP/1.1 and HTTP/2 with TLS, connection pooling and ALPN
/// negotiation. Cloning is cheap and clones share the pool.
///
/// # Example
///
/// ```ignore
/// use fetchpipe_client::transport::HyperTransport;
///
/// let transport = HyperTransport::builder().http2_only(true).build()?;
///
/// let client = HttpClient::builder()
///     .base_url("http://localhost:3000")
///     .transport(transport)
///     .build()?;
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    client: HyperClient,
    http2_only: bool,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("http2_only", &self.http2_only)
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    pub fn builder() -> HyperTransportBuilder {
        HyperTransportBuilder::new()
    }

    /// Create a transport with default settings.
    pub fn new() -> Result<Self, ClientError> {
        Self::builder().build()
    }

    pub fn is_http2_only(&self) -> bool {
        self.http2_only
    }
}

impl Transport for HyperTransport {
    fn send(
        &self,
        request: http::Request<Bytes>,
    ) -> BoxFuture<'static, Result<http::Response<Bytes>, ClientError>> {
        exchange(self.client.clone(), request).boxed()
    }
}

async fn exchange(
    client: HyperClient,
    request: http::Request<Bytes>,
) -> Result<http::Response<Bytes>, ClientError> {
    let response = client
        .request(request.map(TransportBody::from_bytes))
        .await
        .map_err(|e| ClientError::Transport(format!("request failed: {}", e)))?;

    let (parts, body) = response.into_parts();
    let body = body
        .collect()
        .await
        .map_err(|e| ClientError::Transport(format!("failed to read response body: {}", e)))?
        .to_bytes();

    Ok(http::Response::from_parts(parts, body))
}

/// Builder for [`HyperTransport`].
///
/// # Example
///
/// ```ignore
/// use fetchpipe_client::transport::HyperTransportBuilder;
/// use std::time::Duration;
///
/// let transport = HyperTransportBuilder::new()
///     .pool_idle_timeout(Duration::from_secs(90))
///     .pool_max_idle_per_host(8)
///     .build()?;
/// ```
pub struct HyperTransportBuilder {
    tls_config: Option<ClientConfig>,
    /// Skip the HTTP/1.1 upgrade and speak HTTP/2 directly (h2c).
    http2_only: bool,
    pool_idle_timeout: Option<Duration>,
    pool_max_idle_per_host: usize,
}

impl Default for HyperTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HyperTransportBuilder {
    pub fn new() -> Self {
        Self {
            tls_config: None,
            http2_only: false,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 32,
        }
    }

    /// Use a custom TLS configuration (custom roots, client certificates).
    pub fn tls_config(mut self, config: ClientConfig) -> Self {
        self.tls_config = Some(config);
        self
    }

    pub fn http2_only(mut self, enabled: bool) -> Self {
        self.http2_only = enabled;
        self
    }

    /// Close pooled connections idle for longer than `timeout`.
    ///
    /// Default: 90 seconds.
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Keep idle connections open indefinitely.
    pub fn pool_idle_timeout_none(mut self) -> Self {
        self.pool_idle_timeout = None;
        self
    }

    /// Default: 32.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    pub fn build(self) -> Result<HyperTransport, ClientError> {
        let connector = build_https_connector(self.tls_config)?;

        let mut builder = Client::builder(TokioExecutor::new());
        // pool_idle_timeout has no effect without a timer
        builder.pool_timer(TokioTimer::new());
        if let Some(timeout) = self.pool_idle_timeout {
            builder.pool_idle_timeout(timeout);
        }
        builder.pool_max_idle_per_host(self.pool_max_idle_per_host);
        if self.http2_only {
            builder.http2_only(true);
        }

        Ok(HyperTransport {
            client: builder.build(connector),
            http2_only: self.http2_only,
        })
    }
}

impl std::fmt::Debug for HyperTransportBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransportBuilder")
            .field("tls_config", &self.tls_config.is_some())
            .field("http2_only", &self.http2_only)
            .field("pool_idle_timeout", &self.pool_idle_timeout)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .finish()
    }
}

impl Service<http::Request<Bytes>> for HyperTransport {
    type Response = http::Response<Bytes>;
    type Error = ClientError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // hyper_util legacy::Client is always ready
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<Bytes>) -> Self::Future {
        Box::pin(exchange(self.client.clone(), req))
    }
}
