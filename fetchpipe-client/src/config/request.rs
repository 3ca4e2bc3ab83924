//! Per-request configuration.
//!
//! [`RequestConfig`] is a typed record where every field is optional, so
//! that a call-site config can be layered over client defaults with
//! [`merge_config`](super::merge_config).

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue};

use super::transform::Transformer;
use crate::ClientError;
use crate::payload::Payload;

/// HTTP methods the client accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }

    pub(crate) fn to_http(self) -> http::Method {
        match self {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("GET") {
            Ok(Method::Get)
        } else if s.eq_ignore_ascii_case("POST") {
            Ok(Method::Post)
        } else {
            Err(ClientError::Config(format!("unsupported method: {}", s)))
        }
    }
}

/// How the response body is decoded before response transforms run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResponseType {
    /// Parse the body as JSON.
    Json,
    /// Keep the raw bytes.
    Blob,
    /// Decode the body as UTF-8 text.
    Text,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Json => "json",
            ResponseType::Blob => "blob",
            ResponseType::Text => "text",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [ResponseType::Json, ResponseType::Blob, ResponseType::Text]
            .into_iter()
            .find(|candidate| s.eq_ignore_ascii_case(candidate.as_str()))
            .ok_or_else(|| ClientError::Config(format!("unsupported response type: {}", s)))
    }
}

/// Query parameters in insertion order.
///
/// Keys are not de-duplicated and values are not percent-encoded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `key=value` pair.
    pub fn append(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        }
    }
}

/// Configuration for one request, or the defaults of a client.
///
/// Unset fields fall back to the client defaults when merged.
///
/// # Example
///
/// ```ignore
/// use fetchpipe_client::{Method, RequestConfig, ResponseType};
///
/// let config = RequestConfig::new()
///     .url("/users")
///     .method(Method::Post)
///     .try_header("x-request-id", "abc-123")?
///     .json(&serde_json::json!({ "name": "Ada" }))?
///     .response_type(ResponseType::Json);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestConfig {
    pub url: Option<String>,
    pub method: Option<Method>,
    pub base_url: Option<String>,
    pub transform_request: Option<Vec<Transformer>>,
    pub transform_response: Option<Vec<Transformer>>,
    pub headers: Option<HeaderMap>,
    pub params: Option<QueryParams>,
    pub data: Option<Payload>,
    pub timeout: Option<Duration>,
    pub response_type: Option<ResponseType>,
}

impl RequestConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Replace the request transforms.
    pub fn transform_request(mut self, transforms: Vec<Transformer>) -> Self {
        self.transform_request = Some(transforms);
        self
    }

    /// Replace the response transforms.
    pub fn transform_response(mut self, transforms: Vec<Transformer>) -> Self {
        self.transform_response = Some(transforms);
        self
    }

    /// Add a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.get_or_insert_with(HeaderMap::new).insert(name, value);
        self
    }

    /// Add a header from strings, failing on invalid names or values.
    pub fn try_header(self, name: &str, value: &str) -> Result<Self, ClientError> {
        let name = HeaderName::try_from(name)
            .map_err(|_| ClientError::Config(format!("invalid header name: {}", name)))?;
        let value = HeaderValue::try_from(value)
            .map_err(|_| ClientError::Config(format!("invalid header value: {}", value)))?;
        Ok(self.header(name, value))
    }

    /// Replace all headers.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn data(mut self, data: impl Into<Payload>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set a JSON body from any serializable value.
    pub fn json<T: serde::Serialize + ?Sized>(self, value: &T) -> Result<Self, ClientError> {
        Ok(self.data(Payload::json(value)?))
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    /// The URL the request is sent to, before query parameters.
    ///
    /// Relative URLs are joined to `base_url`; absolute URLs are used as is.
    pub fn resolved_url(&self) -> String {
        let url = self.url.as_deref().unwrap_or("");
        match self.base_url.as_deref() {
            Some(base) if !base.is_empty() && !is_absolute(url) => {
                if url.is_empty() {
                    base.to_string()
                } else {
                    format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
                }
            }
            _ => url.to_string(),
        }
    }
}

fn is_absolute(url: &str) -> bool {
    url.contains("://")
}
