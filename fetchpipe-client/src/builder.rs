//! Client builder.
//!
//! Provides a fluent API for configuring and building an [`HttpClient`].

use std::sync::Arc;
use std::time::Duration;

use http::{HeaderName, HeaderValue};

use fetchpipe_core::PassportStore;

use crate::ClientError;
use crate::client::HttpClient;
use crate::config::{
    Method, RequestConfig, ResponseType, Transformer, library_defaults, merge_config,
    process_defaults,
};
use crate::transport::{HyperTransportBuilder, TlsClientConfig, Transport};

/// Errors from [`ClientBuilder::build`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClientBuildError {
    /// The default transport could not be created (usually TLS setup).
    #[error("failed to build transport: {0}")]
    Transport(#[from] ClientError),
}

/// Builder for creating an [`HttpClient`].
///
/// The builder holds the client defaults as a [`RequestConfig`]. Each
/// setter overrides one field; the result is frozen at [`build`](Self::build).
///
/// # Example
///
/// ```ignore
/// use fetchpipe_client::{ClientBuilder, ResponseType};
/// use std::time::Duration;
///
/// let client = ClientBuilder::new()
///     .base_url("http://localhost:3000")
///     .try_header("content-type", "application/json")?
///     .timeout(Duration::from_secs(10))
///     .response_type(ResponseType::Json)
///     .build()?;
/// ```
pub struct ClientBuilder {
    config: RequestConfig,
    transport: Option<Arc<dyn Transport>>,
    hyper: HyperTransportBuilder,
    passport_store: Option<Arc<dyn PassportStore>>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("transport", &self.transport.is_some())
            .field("hyper", &self.hyper)
            .field("passport_store", &self.passport_store.is_some())
            .finish()
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Start from the library defaults with the process-wide defaults layered
    /// on top.
    ///
    /// This reads global state: whatever [`set_config`](crate::set_config)
    /// installed, if anything. Use [`ClientBuilder::layered`] or
    /// [`ClientBuilder::with_defaults`] to keep the starting point explicit.
    pub fn new() -> Self {
        Self::layered(process_defaults())
    }

    /// Start from the library defaults with `process` layered on top.
    pub fn layered(process: Option<&RequestConfig>) -> Self {
        let base = library_defaults();
        let config = match process {
            Some(process) => merge_config(&base, process),
            None => base,
        };
        Self::with_defaults(config)
    }

    /// Start from exactly `config`, ignoring the process defaults.
    pub fn with_defaults(config: RequestConfig) -> Self {
        Self {
            config,
            transport: None,
            hyper: HyperTransportBuilder::new(),
            passport_store: None,
        }
    }

    /// Layer `config` over the current defaults.
    pub fn defaults(mut self, config: RequestConfig) -> Self {
        self.config = merge_config(&self.config, &config);
        self
    }

    /// Set the base URL that relative request URLs are joined to.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = ClientBuilder::new().base_url("https://api.example.com/v1").build()?;
    /// client.get("/users").await?; // GET https://api.example.com/v1/users
    /// ```
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config = self.config.base_url(base_url);
        self
    }

    /// Add a default header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.config = self.config.header(name, value);
        self
    }

    /// Add a default header from strings.
    pub fn try_header(mut self, name: &str, value: &str) -> Result<Self, ClientError> {
        self.config = self.config.try_header(name, value)?;
        Ok(self)
    }

    pub fn method(mut self, method: Method) -> Self {
        self.config = self.config.method(method);
        self
    }

    /// Default timeout for every request.
    ///
    /// A request that takes longer fails with [`ClientError::Timeout`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.config = self.config.response_type(response_type);
        self
    }

    /// Append a request transform after the current ones.
    pub fn transform_request(mut self, transform: Transformer) -> Self {
        self.config
            .transform_request
            .get_or_insert_with(Vec::new)
            .push(transform);
        self
    }

    /// Append a response transform after the current ones.
    pub fn transform_response(mut self, transform: Transformer) -> Self {
        self.config
            .transform_response
            .get_or_insert_with(Vec::new)
            .push(transform);
        self
    }

    /// Use a custom transport instead of the hyper one.
    ///
    /// When set, the hyper options below are ignored.
    pub fn transport<T: Transport>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn tls_config(mut self, config: TlsClientConfig) -> Self {
        self.hyper = self.hyper.tls_config(config);
        self
    }

    /// Speak HTTP/2 without the HTTP/1.1 upgrade (h2c).
    pub fn http2_only(mut self, enabled: bool) -> Self {
        self.hyper = self.hyper.http2_only(enabled);
        self
    }

    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.hyper = self.hyper.pool_idle_timeout(timeout);
        self
    }

    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.hyper = self.hyper.pool_max_idle_per_host(max);
        self
    }

    /// Where [`HttpClient::send_pack`] reads the passport from.
    ///
    /// Without a store, packs carry a `null` passport.
    pub fn passport_store<S: PassportStore + 'static>(mut self, store: S) -> Self {
        self.passport_store = Some(Arc::new(store));
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpClient, ClientBuildError> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(self.hyper.build()?),
        };
        let passport_store: Arc<dyn PassportStore> = match self.passport_store {
            Some(store) => store,
            None => Arc::new(()),
        };

        Ok(HttpClient::from_parts(transport, self.config, passport_store))
    }
}
