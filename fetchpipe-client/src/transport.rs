//! HTTP transport layer.
//!
//! The dispatcher talks to the network through the [`Transport`] trait. Two
//! implementations ship with the crate:
//!
//! - [`HyperTransport`]: hyper_util's pooled client, HTTP/1.1 and HTTP/2,
//!   TLS via rustls (feature-gated)
//! - [`FnTransport`]: wraps an async closure, for tests and in-process fakes
//!
//! # Feature Flags
//!
//! - `tls` (default) - Enables `tls-ring` + `tls-native-roots`
//! - `tls-ring` / `tls-aws-lc` - Crypto providers
//! - `tls-native-roots` / `tls-webpki-roots` - Root certificates
//!
//! # Example
//!
//! ```ignore
//! use fetchpipe_client::transport::{FnTransport, HyperTransportBuilder};
//! use std::time::Duration;
//!
//! let transport = HyperTransportBuilder::new()
//!     .pool_idle_timeout(Duration::from_secs(60))
//!     .build()?;
//!
//! // A fake that answers every request with 204
//! let fake = FnTransport::new(|_request| async {
//!     Ok(http::Response::builder().status(204).body(bytes::Bytes::new()).unwrap())
//! });
//! ```

mod body;
mod connector;
mod hyper;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::ClientError;

pub use body::TransportBody;
pub use connector::{build_https_connector, has_tls_support};
#[cfg(any(feature = "tls-native-roots", feature = "tls-webpki-roots"))]
pub use connector::default_tls_config;
pub use self::hyper::{HyperTransport, HyperTransportBuilder};

// Re-export the rustls config type so callers can pass custom TLS settings
pub use rustls::ClientConfig as TlsClientConfig;

/// Sends one fully buffered request and returns the fully buffered response.
///
/// Failures to complete the exchange are [`ClientError::Transport`]. An
/// answer with any status code is a successful send.
pub trait Transport: Send + Sync + 'static {
    fn send(
        &self,
        request: http::Request<Bytes>,
    ) -> BoxFuture<'static, Result<http::Response<Bytes>, ClientError>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(
        &self,
        request: http::Request<Bytes>,
    ) -> BoxFuture<'static, Result<http::Response<Bytes>, ClientError>> {
        (**self).send(request)
    }
}

/// A [`Transport`] backed by an async closure.
#[derive(Clone)]
pub struct FnTransport<F> {
    func: F,
}

impl<F, Fut> FnTransport<F>
where
    F: Fn(http::Request<Bytes>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<http::Response<Bytes>, ClientError>> + Send + 'static,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn(http::Request<Bytes>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<http::Response<Bytes>, ClientError>> + Send + 'static,
{
    fn send(
        &self,
        request: http::Request<Bytes>,
    ) -> BoxFuture<'static, Result<http::Response<Bytes>, ClientError>> {
        (self.func)(request).boxed()
    }
}

impl<F> fmt::Debug for FnTransport<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransport").finish_non_exhaustive()
    }
}
