//! Request bodies and decoded response data.

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ClientError;

/// A body flowing through the pipeline.
///
/// On the way out this is the request body before and after each request
/// transform. On the way back it is the decoded response data before and
/// after each response transform.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Payload {
    /// No body.
    #[default]
    Empty,
    /// A JSON document.
    Json(Value),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Bytes(Bytes),
}

impl Payload {
    /// Serialize `value` into a JSON payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ClientError> {
        serde_json::to_value(value)
            .map(Payload::Json)
            .map_err(|e| ClientError::Config(format!("payload is not serializable: {}", e)))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Payload::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Deserialize a JSON payload into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        match self {
            Payload::Json(value) => T::deserialize(value)
                .map_err(|e| ClientError::Decode(format!("JSON decoding failed: {}", e))),
            other => Err(ClientError::Decode(format!(
                "expected a JSON payload, got {}",
                other.kind()
            ))),
        }
    }

    /// Turn the payload into the bytes written to the wire.
    ///
    /// JSON values that were not turned into text by a transform are
    /// serialized here.
    pub fn into_body(self) -> Result<Bytes, ClientError> {
        match self {
            Payload::Empty => Ok(Bytes::new()),
            Payload::Json(value) => serde_json::to_vec(&value)
                .map(Bytes::from)
                .map_err(|e| ClientError::Transform(format!("JSON encoding failed: {}", e))),
            Payload::Text(text) => Ok(Bytes::from(text)),
            Payload::Bytes(bytes) => Ok(bytes),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Payload::Empty => "empty",
            Payload::Json(_) => "json",
            Payload::Text(_) => "text",
            Payload::Bytes(_) => "bytes",
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Payload::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(Bytes::from(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Point {
        x: i32,
    }

    #[test]
    fn test_into_body() {
        assert!(Payload::Empty.into_body().unwrap().is_empty());
        assert_eq!(Payload::from(json!({"x": 1})).into_body().unwrap(), Bytes::from(r#"{"x":1}"#));
        assert_eq!(Payload::from("hi").into_body().unwrap(), Bytes::from("hi"));
        assert_eq!(Payload::from(vec![1u8, 2]).into_body().unwrap(), Bytes::from(vec![1u8, 2]));
    }

    #[test]
    fn test_deserialize_json() {
        let payload = Payload::json(&json!({"x": 3})).unwrap();
        assert_eq!(payload.deserialize::<Point>().unwrap(), Point { x: 3 });
    }

    #[test]
    fn test_deserialize_wrong_kind() {
        let err = Payload::from("x").deserialize::<Point>().unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_accessors() {
        assert!(Payload::default().is_empty());
        assert_eq!(Payload::from("t").as_text(), Some("t"));
        assert!(Payload::from("t").as_json().is_none());
        assert_eq!(Payload::from(Bytes::from("b")).as_bytes(), Some(&Bytes::from("b")));
    }
}
