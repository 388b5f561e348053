//! Session records and attribute values.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::utils;

/// Session id → record, as held by a session manager for one domain.
pub type SessionMap = HashMap<String, SessionRecord>;

/// Type names used by the built-in `From` conversions on [`AttributeValue`].
pub mod type_names {
    pub const STRING: &str = "string";
    pub const INTEGER: &str = "integer";
    pub const FLOAT: &str = "float";
    pub const BOOLEAN: &str = "boolean";

    /// All built-in names, in registration order.
    pub const BUILTIN: [&str; 4] = [STRING, INTEGER, FLOAT, BOOLEAN];
}

// ─────────────────────────────────────────────
// AttributeValue
// ─────────────────────────────────────────────

/// A single session attribute: a type name plus its JSON payload.
///
/// The type name is what a [`DeserializationContext`](crate::DeserializationContext)
/// resolves on load. Values built through `From<&str>`, `From<i64>` and friends
/// use the names in [`type_names`]; anything else goes through
/// [`AttributeValue::from_serialize`] with a name the caller picks. Floats go
/// through `TryFrom<f64>`, which rejects NaN and infinities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeValue {
    #[serde(rename = "type")]
    type_name: String,
    value: serde_json::Value,
}

impl AttributeValue {
    /// Create a value from an already-encoded JSON payload.
    pub fn new(type_name: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            type_name: type_name.into(),
            value,
        }
    }

    /// Serialize `value` and tag it with `type_name`.
    pub fn from_serialize<T: Serialize + ?Sized>(
        type_name: impl Into<String>,
        value: &T,
    ) -> Result<Self> {
        Ok(Self::new(type_name, serde_json::to_value(value)?))
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.value
    }

    /// The payload as a string slice, if it is a JSON string.
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// Deserialize the payload into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(T::deserialize(&self.value)?)
    }

    pub(crate) fn set_type_name(&mut self, type_name: String) {
        self.type_name = type_name;
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::new(type_names::STRING, serde_json::Value::from(s))
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::new(type_names::STRING, serde_json::Value::from(s))
    }
}

impl From<i64> for AttributeValue {
    fn from(n: i64) -> Self {
        Self::new(type_names::INTEGER, serde_json::Value::from(n))
    }
}

/// NaN and the infinities have no JSON form and are rejected.
impl TryFrom<f64> for AttributeValue {
    type Error = Error;

    fn try_from(n: f64) -> Result<Self> {
        let number = serde_json::Number::from_f64(n).ok_or(Error::NonFiniteFloat(n))?;
        Ok(Self::new(type_names::FLOAT, serde_json::Value::Number(number)))
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::new(type_names::BOOLEAN, serde_json::Value::from(b))
    }
}

// ─────────────────────────────────────────────
// SessionRecord
// ─────────────────────────────────────────────

/// One persisted session: an absolute expiration and its attribute bag.
///
/// Expiration is kept at millisecond precision, which is what the session
/// file stores, so a record compares equal to itself after a round trip.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionRecord {
    expiration: DateTime<Utc>,
    attributes: BTreeMap<String, AttributeValue>,
}

impl SessionRecord {
    /// Create a record with no attributes.
    pub fn new(expiration: DateTime<Utc>) -> Self {
        Self::with_attributes(expiration, BTreeMap::new())
    }

    /// Create a record from an existing attribute map.
    pub fn with_attributes(
        expiration: DateTime<Utc>,
        attributes: BTreeMap<String, AttributeValue>,
    ) -> Self {
        Self {
            expiration: utils::truncate_to_millis(expiration),
            attributes,
        }
    }

    /// Builder-style attribute insert.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn expiration(&self) -> DateTime<Utc> {
        self.expiration
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut BTreeMap<String, AttributeValue> {
        &mut self.attributes
    }

    pub fn into_attributes(self) -> BTreeMap<String, AttributeValue> {
        self.attributes
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// A record is expired once `now` reaches its expiration.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Cart {
        items: Vec<String>,
        total_cents: u64,
    }

    #[test]
    fn test_from_str_uses_string_type() {
        let value = AttributeValue::from("boot");
        assert_eq!(value.type_name(), type_names::STRING);
        assert_eq!(value.as_str(), Some("boot"));
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(AttributeValue::from(42i64).type_name(), "integer");
        assert_eq!(AttributeValue::from(true).value(), &serde_json::Value::Bool(true));
        assert_eq!(AttributeValue::try_from(1.5).unwrap().decode::<f64>().unwrap(), 1.5);
        assert_eq!(AttributeValue::try_from(1.5).unwrap().type_name(), "float");
    }

    #[test]
    fn test_non_finite_floats_rejected() {
        for n in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                AttributeValue::try_from(n),
                Err(Error::NonFiniteFloat(_))
            ));
        }
    }

    #[test]
    fn test_from_serialize_and_decode_struct() {
        let cart = Cart {
            items: vec!["book".into(), "pen".into()],
            total_cents: 1299,
        };
        let value = AttributeValue::from_serialize("shop.Cart", &cart).unwrap();
        assert_eq!(value.type_name(), "shop.Cart");
        assert_eq!(value.decode::<Cart>().unwrap(), cart);
    }

    #[test]
    fn test_decode_wrong_type_fails() {
        let value = AttributeValue::from("not a number");
        assert!(value.decode::<u32>().is_err());
    }

    #[test]
    fn test_record_truncates_to_millis() {
        let precise = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let record = SessionRecord::new(precise);
        assert_eq!(record.expiration().timestamp_millis(), precise.timestamp_millis());
        assert_eq!(record.expiration().timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let now = Utc::now();
        let record = SessionRecord::new(now);
        let now = record.expiration();
        assert!(record.is_expired_at(now));
        assert!(!record.is_expired_at(now - Duration::milliseconds(1)));
    }

    #[test]
    fn test_with_attribute_builder() {
        let record = SessionRecord::new(Utc::now())
            .with_attribute("spring", "boot")
            .with_attribute("visits", 3i64);
        assert_eq!(record.attributes().len(), 2);
        assert_eq!(record.get("spring").and_then(AttributeValue::as_str), Some("boot"));
        assert_eq!(record.get("visits").unwrap().decode::<i64>().unwrap(), 3);
        assert!(record.get("missing").is_none());
    }
}
