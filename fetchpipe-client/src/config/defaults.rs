//! Built-in and process-wide default configurations.

use std::sync::OnceLock;

use http::{HeaderMap, HeaderValue, header};

use super::request::{Method, RequestConfig, ResponseType};
use super::transform::Transformer;
use crate::ClientError;

static PROCESS_DEFAULTS: OnceLock<RequestConfig> = OnceLock::new();

/// The defaults every client starts from.
///
/// - empty url and base url
/// - `GET`
/// - no headers
/// - JSON response decoding
/// - one request transform that JSON-encodes the body
/// - no response transforms
pub fn library_defaults() -> RequestConfig {
    RequestConfig {
        url: Some(String::new()),
        method: Some(Method::Get),
        base_url: Some(String::new()),
        transform_request: Some(vec![Transformer::json_encode()]),
        transform_response: Some(Vec::new()),
        headers: Some(HeaderMap::new()),
        params: None,
        data: None,
        timeout: None,
        response_type: Some(ResponseType::Json),
    }
}

impl RequestConfig {
    /// Transport defaults for talking to an envelope service:
    /// `POST`, `Content-Type: application/json`, JSON responses.
    pub fn service_defaults() -> Self {
        RequestConfig::new()
            .method(Method::Post)
            .header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .response_type(ResponseType::Json)
    }
}

/// Install the process-wide default configuration.
///
/// Meant to be called once during startup, before any client is built.
/// [`ClientBuilder::new`](crate::ClientBuilder::new) layers it over the
/// library defaults; clients built earlier are not affected.
///
/// # Errors
///
/// Returns [`ClientError::Config`] if defaults were already installed.
pub fn set_config(config: RequestConfig) -> Result<(), ClientError> {
    PROCESS_DEFAULTS
        .set(config)
        .map_err(|_| ClientError::Config("process defaults are already set".into()))
}

/// The process-wide default configuration, if installed.
pub fn process_defaults() -> Option<&'static RequestConfig> {
    PROCESS_DEFAULTS.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_defaults() {
        let defaults = library_defaults();
        assert_eq!(defaults.method, Some(Method::Get));
        assert_eq!(defaults.response_type, Some(ResponseType::Json));
        assert_eq!(defaults.url.as_deref(), Some(""));
        assert_eq!(defaults.transform_request.as_ref().map(Vec::len), Some(1));
        assert_eq!(defaults.transform_response.as_ref().map(Vec::len), Some(0));
        assert!(defaults.headers.unwrap().is_empty());
    }

    #[test]
    fn test_service_defaults() {
        let defaults = RequestConfig::service_defaults();
        assert_eq!(defaults.method, Some(Method::Post));
        assert_eq!(
            defaults.headers.unwrap().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    // Every test touching the process-wide slot installs the same preset,
    // so the first one to run wins and the rest observe identical state.
    #[test]
    fn test_set_config_only_once() {
        let _ = set_config(RequestConfig::service_defaults());
        assert_eq!(process_defaults().and_then(|c| c.method), Some(Method::Post));

        let err = set_config(RequestConfig::new()).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
        assert_eq!(process_defaults().and_then(|c| c.method), Some(Method::Post));
    }
}
