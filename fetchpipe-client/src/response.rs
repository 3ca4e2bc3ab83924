//! Response types.
//!
//! This module provides [`ResponseEnvelope`], the normalized result of one
//! completed exchange, along with the raw request and response it was
//! assembled from.

use bytes::Bytes;
use http::{HeaderMap, StatusCode, Version};
use serde::de::DeserializeOwned;

use fetchpipe_core::ResponsePack;

use crate::ClientError;
use crate::config::{Method, RequestConfig};
use crate::payload::Payload;

/// The request exactly as it was handed to the transport.
#[derive(Clone, Debug)]
pub struct RawRequest {
    pub method: Method,
    /// Full URI, query string included.
    pub uri: String,
    pub headers: HeaderMap,
    /// Body after request transforms and serialization.
    pub body: Bytes,
}

/// The response exactly as the transport returned it.
#[derive(Clone, Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub version: Version,
    pub headers: HeaderMap,
    /// Body before decoding.
    pub body: Bytes,
}

/// Result of a completed exchange.
///
/// A response is produced for every status code. A 4xx or 5xx answer with
/// a decodable body is still a response, so check [`status`](Self::status)
/// or [`is_success`](Self::is_success).
///
/// # Example
///
/// ```ignore
/// let response = client.request(RequestConfig::new().url("/users/1")).await?;
///
/// if response.is_success() {
///     let user: User = response.json()?;
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ResponseEnvelope {
    /// The merged config the dispatcher ran with.
    pub config: RequestConfig,
    pub request: RawRequest,
    pub response: RawResponse,
    /// Decoded and transformed body.
    pub data: Payload,
    pub status: u16,
    pub status_text: String,
    pub headers: HeaderMap,
}

impl ResponseEnvelope {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize JSON data into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        self.data.deserialize()
    }

    /// Read the data as a [`ResponsePack`] envelope.
    pub fn pack(&self) -> Result<ResponsePack, ClientError> {
        match &self.data {
            Payload::Json(value) => Ok(ResponsePack::from_value(value.clone())?),
            Payload::Text(text) => Ok(ResponsePack::from_slice(text.as_bytes())?),
            Payload::Bytes(bytes) => Ok(ResponsePack::from_slice(bytes)?),
            Payload::Empty => Err(ClientError::Decode("response has no body".into())),
        }
    }

    /// Get a response header as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Extract the data, discarding everything else.
    pub fn into_data(self) -> Payload {
        self.data
    }
}
