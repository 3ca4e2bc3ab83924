//! HTTP client with an interceptor pipeline.
//!
//! Every call runs as one sequential chain:
//!
//! ```text
//! request interceptors  ->  dispatch  ->  response interceptors
//! ```
//!
//! - Per-call [`RequestConfig`] is merged over the client defaults
//! - Request transforms shape the body before it is sent
//! - The response body is decoded as JSON, text or raw bytes
//! - Response transforms shape the decoded data
//! - [`RequestPack`] wraps a resource in the envelope the remote service expects
//!
//! ## Example
//!
//! ```ignore
//! use fetchpipe_client::{HttpClient, Interceptor, RequestConfig};
//!
//! let client = HttpClient::builder()
//!     .base_url("http://localhost:3000")
//!     .try_header("content-type", "application/json")?
//!     .build()?;
//!
//! // Runs before every request
//! client.interceptors().request.use_interceptor(Interceptor::new(
//!     |config: RequestConfig| async move { config.try_header("x-app", "demo") },
//! ));
//!
//! let response = client.get("/users/1").await?;
//! let user: User = response.json()?;
//! ```
//!
//! ## Sending packs
//!
//! ```ignore
//! use fetchpipe_client::{HttpClient, MemoryStore};
//!
//! let client = HttpClient::builder()
//!     .base_url("http://localhost:3000")
//!     .passport_store(MemoryStore::with_passport("token"))
//!     .build()?;
//!
//! // POSTs {"passport":"token","session":"<uuid>","resource":"{\"id\":7}","sign":"","other":null}
//! let response = client.send_pack("/rpc/user", Some(&serde_json::json!({ "id": 7 }))).await?;
//! let pack = response.pack()?;
//! let user: Option<User> = pack.decode_resource()?;
//! ```
//!
//! ## Errors
//!
//! Failures surface as [`ClientError`]. HTTP status codes never do: a 404
//! or 500 with a decodable body is a [`ResponseEnvelope`], check
//! [`ResponseEnvelope::status`].
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `tls` (default) | `tls-ring` + `tls-native-roots` |
//! | `tls-ring` / `tls-aws-lc` | rustls crypto provider |
//! | `tls-native-roots` / `tls-webpki-roots` | Root certificate source |
//! | `tracing` | `http.request` spans and dispatcher debug events |

mod builder;
mod client;
pub mod config;
mod dispatch;
mod error;
mod interceptor;
mod payload;
mod response;
pub mod transport;
mod url;

pub use builder::{ClientBuildError, ClientBuilder};
pub use client::HttpClient;
pub use config::{
    Method, QueryParams, RequestConfig, ResponseType, Transformer, library_defaults,
    merge_config, process_defaults, set_config,
};
pub use dispatch::dispatch;
pub use error::ClientError;
pub use interceptor::{Interceptor, InterceptorHandle, InterceptorManager, Interceptors};
pub use payload::Payload;
pub use response::{RawRequest, RawResponse, ResponseEnvelope};
pub use transport::{FnTransport, HyperTransport, HyperTransportBuilder, Transport};
pub use url::build_url;

pub use fetchpipe_core::{
    EnvelopeError, MemoryStore, PASSPORT_KEY, PassportStore, RequestPack, ResponsePack,
    build_envelope,
};

// Re-export commonly used types
pub use bytes::Bytes;
pub use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
