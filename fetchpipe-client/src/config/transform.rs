//! Request and response transforms.
//!
//! A transform receives the current payload plus the headers of the
//! exchange and returns the next payload. The dispatcher reduces a list
//! of transforms left-to-right.

use std::fmt;
use std::sync::Arc;

use http::HeaderMap;

use crate::ClientError;
use crate::payload::Payload;

type TransformFn = dyn Fn(Payload, &HeaderMap) -> Result<Payload, ClientError> + Send + Sync;

/// A single payload transform.
///
/// # Example
///
/// ```ignore
/// use fetchpipe_client::{Payload, Transformer};
///
/// let upper = Transformer::map(|data, _headers| match data {
///     Payload::Text(text) => Payload::Text(text.to_uppercase()),
///     other => other,
/// });
/// ```
#[derive(Clone)]
pub struct Transformer {
    func: Arc<TransformFn>,
}

impl Transformer {
    /// Create a transform that cannot fail.
    pub fn map<F>(func: F) -> Self
    where
        F: Fn(Payload, &HeaderMap) -> Payload + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(move |data: Payload, headers: &HeaderMap| Ok(func(data, headers))),
        }
    }

    /// Create a transform that may fail.
    ///
    /// Any error it returns surfaces as [`ClientError::Transform`].
    pub fn try_map<F, E>(func: F) -> Self
    where
        F: Fn(Payload, &HeaderMap) -> Result<Payload, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        Self {
            func: Arc::new(move |data: Payload, headers: &HeaderMap| {
                func(data, headers).map_err(|e| ClientError::Transform(e.to_string()))
            }),
        }
    }

    /// The default request transform: JSON-encode the payload.
    ///
    /// JSON values and text become JSON text; empty and binary payloads
    /// pass through untouched.
    pub fn json_encode() -> Self {
        Self::try_map(|data, _headers| match data {
            Payload::Json(value) => serde_json::to_string(&value).map(Payload::Text),
            Payload::Text(text) => serde_json::to_string(&text).map(Payload::Text),
            other => Ok(other),
        })
    }

    /// Apply the transform.
    pub fn apply(&self, data: Payload, headers: &HeaderMap) -> Result<Payload, ClientError> {
        (self.func)(data, headers)
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer").finish_non_exhaustive()
    }
}

/// Reduce `data` through `transforms` in order.
pub(crate) fn apply_transforms(
    transforms: &[Transformer],
    data: Payload,
    headers: &HeaderMap,
) -> Result<Payload, ClientError> {
    transforms
        .iter()
        .try_fold(data, |data, transform| transform.apply(data, headers))
}
