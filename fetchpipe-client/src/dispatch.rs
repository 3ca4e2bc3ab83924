//! The terminal stage of a request: one HTTP exchange.
//!
//! [`dispatch`] runs the request transforms, sends the request through a
//! [`Transport`], decodes the body according to the response type, runs
//! the response transforms and assembles a [`ResponseEnvelope`].

use std::time::Duration;

use bytes::Bytes;
use hyper::ext::ReasonPhrase;

use crate::ClientError;
use crate::config::{RequestConfig, ResponseType, apply_transforms};
use crate::payload::Payload;
use crate::response::{RawRequest, RawResponse, ResponseEnvelope};
use crate::transport::Transport;
use crate::url::build_url;

/// Perform one exchange for an already merged config.
///
/// Status codes are not inspected: a 500 with a decodable body resolves.
///
/// # Errors
///
/// - [`ClientError::Transform`] if a request or response transform fails
/// - [`ClientError::Config`] if the request cannot be built
/// - [`ClientError::Transport`] / [`ClientError::Timeout`] if the exchange fails
/// - [`ClientError::Decode`] if the body does not match the response type
pub async fn dispatch(
    transport: &dyn Transport,
    mut config: RequestConfig,
) -> Result<ResponseEnvelope, ClientError> {
    let method = config.method.unwrap_or_default();
    let headers = config.headers.clone().unwrap_or_default();

    let data = config.data.take().unwrap_or_default();
    let data = apply_transforms(config.transform_request.as_deref().unwrap_or(&[]), data, &headers)?;
    let body = data.clone().into_body()?;
    config.data = Some(data);

    let uri = build_url(&config.resolved_url(), config.params.as_ref());

    #[cfg(feature = "tracing")]
    tracing::debug!(method = %method, uri = %uri, body_len = body.len(), "dispatching request");

    let mut builder = http::Request::builder().method(method.to_http()).uri(uri.as_str());
    if let Some(request_headers) = builder.headers_mut() {
        request_headers.extend(headers.clone());
    }
    let request = builder
        .body(body.clone())
        .map_err(|e| ClientError::Config(format!("failed to build request for {}: {}", uri, e)))?;

    let response = send(transport, request, config.timeout).await?;
    let (parts, raw_body) = response.into_parts();

    #[cfg(feature = "tracing")]
    tracing::debug!(status = parts.status.as_u16(), body_len = raw_body.len(), "received response");

    let decoded = decode(config.response_type, &raw_body)?;
    let data = apply_transforms(
        config.transform_response.as_deref().unwrap_or(&[]),
        decoded,
        &parts.headers,
    )?;

    Ok(ResponseEnvelope {
        status: parts.status.as_u16(),
        status_text: status_text(&parts),
        headers: parts.headers.clone(),
        data,
        request: RawRequest {
            method,
            uri,
            headers,
            body,
        },
        response: RawResponse {
            status: parts.status,
            version: parts.version,
            headers: parts.headers,
            body: raw_body,
        },
        config,
    })
}

async fn send(
    transport: &dyn Transport,
    request: http::Request<Bytes>,
    timeout: Option<Duration>,
) -> Result<http::Response<Bytes>, ClientError> {
    let exchange = transport.send(request);
    match timeout {
        Some(limit) => tokio::time::timeout(limit, exchange)
            .await
            .map_err(|_| ClientError::Timeout(limit))?,
        None => exchange.await,
    }
}

/// Decode a raw body per the declared response type.
///
/// With no response type the bytes pass through as [`Payload::Bytes`].
/// An empty body is not valid JSON; expect it with [`ResponseType::Blob`].
/// Text is decoded lossily, invalid sequences become U+FFFD.
pub(crate) fn decode(response_type: Option<ResponseType>, body: &Bytes) -> Result<Payload, ClientError> {
    match response_type {
        Some(ResponseType::Json) => serde_json::from_slice(body)
            .map(Payload::Json)
            .map_err(|e| ClientError::Decode(format!("malformed JSON body: {}", e))),
        Some(ResponseType::Text) => Ok(Payload::Text(String::from_utf8_lossy(body).into_owned())),
        Some(ResponseType::Blob) | None => Ok(Payload::Bytes(body.clone())),
    }
}

/// The server's reason phrase when hyper kept one, else the canonical one.
fn status_text(parts: &http::response::Parts) -> String {
    match parts.extensions.get::<ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => parts.status.canonical_reason().unwrap_or_default().to_string(),
    }
}
