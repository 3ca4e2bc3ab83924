//! Request and response packs.
//!
//! Every call to the remote service carries a JSON object of this shape:
//!
//! ```text
//! {
//!   "passport": string | null,   identity token from the passport store
//!   "session":  string,          fresh uuid v4 per request
//!   "resource": string,          JSON-encoded payload, "" when there is none
//!   "sign":     "",              reserved, never filled at this layer
//!   "other":    null             reserved
//! }
//! ```
//!
//! Field names and the `null` vs `""` distinctions are part of the wire
//! contract. The service answers with a [`ResponsePack`] whose `resource`
//! follows the same encoding.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::EnvelopeError;
use crate::store::PassportStore;

/// Outbound envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPack {
    pub passport: Option<String>,
    pub session: String,
    pub resource: String,
    pub sign: String,
    /// Reserved; always `null` on the wire. Inbound values are discarded.
    #[serde(default, deserialize_with = "discard")]
    pub other: (),
}

fn discard<'de, D: Deserializer<'de>>(deserializer: D) -> Result<(), D::Error> {
    IgnoredAny::deserialize(deserializer).map(|_| ())
}

impl RequestPack {
    /// Same as [`build_envelope`].
    pub fn new<T>(passport: Option<String>, resource: Option<&T>) -> Result<Self, EnvelopeError>
    where
        T: Serialize + ?Sized,
    {
        build_envelope(passport, resource)
    }

    /// A pack with no resource.
    pub fn empty(passport: Option<String>) -> Self {
        Self {
            passport,
            session: Uuid::new_v4().to_string(),
            resource: String::new(),
            sign: String::new(),
            other: (),
        }
    }

    /// A pack carrying `resource` encoded as a JSON string.
    pub fn with_resource<T>(passport: Option<String>, resource: &T) -> Result<Self, EnvelopeError>
    where
        T: Serialize + ?Sized,
    {
        let encoded =
            serde_json::to_string(resource).map_err(|e| EnvelopeError::Encode(e.to_string()))?;
        Ok(Self {
            resource: encoded,
            ..Self::empty(passport)
        })
    }

    /// Build a pack using the passport held by `store`.
    pub fn from_store<S, T>(store: &S, resource: Option<&T>) -> Result<Self, EnvelopeError>
    where
        S: PassportStore + ?Sized,
        T: Serialize + ?Sized,
    {
        build_envelope(store.passport(), resource)
    }

    /// Render the pack as the JSON text sent on the wire.
    pub fn to_json(&self) -> Result<String, EnvelopeError> {
        serde_json::to_string(self).map_err(|e| EnvelopeError::Encode(e.to_string()))
    }

    /// Render the pack as a JSON value.
    pub fn to_value(&self) -> Result<Value, EnvelopeError> {
        serde_json::to_value(self).map_err(|e| EnvelopeError::Encode(e.to_string()))
    }
}

/// Build an outbound envelope.
///
/// `None` for `resource` produces the `""` sentinel; telling "no payload"
/// apart from "empty payload" is up to the caller.
pub fn build_envelope<T>(passport: Option<String>, resource: Option<&T>) -> Result<RequestPack, EnvelopeError>
where
    T: Serialize + ?Sized,
{
    match resource {
        Some(resource) => RequestPack::with_resource(passport, resource),
        None => Ok(RequestPack::empty(passport)),
    }
}

/// Inbound envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponsePack {
    pub code: i64,
    pub message: String,
    pub success: bool,
    pub session: String,
    pub resource: String,
    #[serde(default)]
    pub sign: String,
    #[serde(default)]
    pub other: Option<Value>,
}

impl ResponsePack {
    /// Parse a pack from a response body.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        serde_json::from_slice(bytes).map_err(|e| EnvelopeError::Decode(e.to_string()))
    }

    /// Parse a pack from an already decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, EnvelopeError> {
        serde_json::from_value(value).map_err(|e| EnvelopeError::Decode(e.to_string()))
    }

    /// Whether the service returned a resource at all.
    pub fn has_resource(&self) -> bool {
        !self.resource.is_empty()
    }

    /// Decode the embedded resource.
    ///
    /// Returns `Ok(None)` for the `""` sentinel.
    pub fn decode_resource<T: DeserializeOwned>(&self) -> Result<Option<T>, EnvelopeError> {
        if !self.has_resource() {
            return Ok(None);
        }
        serde_json::from_str(&self.resource)
            .map(Some)
            .map_err(|e| EnvelopeError::ResourceNotJson(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_envelope_without_resource() {
        let pack = build_envelope::<Value>(None, None).unwrap();
        assert_eq!(pack.resource, "");
        assert!(pack.passport.is_none());
        assert_eq!(pack.sign, "");
    }

    #[test]
    fn test_envelope_with_resource() {
        let pack = build_envelope(Some("tok".to_string()), Some(&json!({"y": 2}))).unwrap();
        assert_eq!(pack.resource, r#"{"y":2}"#);
        assert_eq!(pack.passport.as_deref(), Some("tok"));

        let pack = RequestPack::new(None, Some(&[1, 2])).unwrap();
        assert_eq!(pack.resource, "[1,2]");
    }

    #[test]
    fn test_sessions_are_unique() {
        let a = RequestPack::empty(None);
        let b = RequestPack::empty(None);
        assert_ne!(a.session, b.session);
        assert!(Uuid::parse_str(&a.session).is_ok());
    }

    #[test]
    fn test_wire_shape() {
        let pack = RequestPack::empty(None);
        let value: Value = serde_json::from_str(&pack.to_json().unwrap()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 5);
        assert_eq!(object["passport"], Value::Null);
        assert_eq!(object["resource"], json!(""));
        assert_eq!(object["sign"], json!(""));
        assert_eq!(object["other"], Value::Null);
        assert!(object["session"].is_string());
    }

    #[test]
    fn test_inbound_other_is_discarded() {
        let pack: RequestPack = serde_json::from_value(json!({
            "passport": "tok",
            "session": "s",
            "resource": "",
            "sign": "",
            "other": {"smuggled": true}
        }))
        .unwrap();
        assert_eq!(pack.to_value().unwrap()["other"], Value::Null);

        let pack: RequestPack =
            serde_json::from_str(r#"{"passport":null,"session":"s","resource":"","sign":""}"#).unwrap();
        assert_eq!(pack.to_value().unwrap()["other"], Value::Null);
    }

    #[test]
    fn test_from_store_reads_passport() {
        let store = MemoryStore::with_passport("abc");
        let pack = RequestPack::from_store(&store, Some(&vec![1, 2])).unwrap();
        assert_eq!(pack.passport.as_deref(), Some("abc"));
        assert_eq!(pack.resource, "[1,2]");

        let pack = RequestPack::from_store::<_, Value>(&MemoryStore::new(), None).unwrap();
        assert!(pack.passport.is_none());
    }

    #[test]
    fn test_string_resource_is_json_encoded() {
        let pack = RequestPack::with_resource(None, "hi").unwrap();
        assert_eq!(pack.resource, r#""hi""#);
    }

    #[test]
    fn test_response_pack_decode_resource() {
        let body = br#"{"code":0,"message":"ok","success":true,"session":"s","resource":"{\"x\":1}","sign":"","other":null}"#;
        let pack = ResponsePack::from_slice(body).unwrap();
        assert!(pack.success);
        let resource: Value = pack.decode_resource().unwrap().unwrap();
        assert_eq!(resource, json!({"x": 1}));
    }

    #[test]
    fn test_response_pack_empty_resource() {
        let pack = ResponsePack::from_value(json!({
            "code": 0,
            "message": "",
            "success": true,
            "session": "s",
            "resource": ""
        }))
        .unwrap();
        assert!(!pack.has_resource());
        assert_eq!(pack.decode_resource::<Value>().unwrap(), None);
    }

    #[test]
    fn test_response_pack_resource_not_json() {
        let pack = ResponsePack::from_value(json!({
            "code": 1,
            "message": "bad",
            "success": false,
            "session": "s",
            "resource": "not json"
        }))
        .unwrap();
        let err = pack.decode_resource::<Value>().unwrap_err();
        assert!(matches!(err, EnvelopeError::ResourceNotJson(_)));
    }

    #[test]
    fn test_response_pack_malformed() {
        let err = ResponsePack::from_slice(b"{").unwrap_err();
        assert!(matches!(err, EnvelopeError::Decode(_)));
    }
}
