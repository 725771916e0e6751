/// Webhook event payload
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// A Gumroad ping, kept as the raw key/value mapping it arrived as.
///
/// Identifier fields are present when they hold a non-empty string, a
/// non-zero number or `true`; numbers and booleans read back in their JSON
/// text form. Missing keys, `null`, `""`, `0`, `false`, arrays and objects
/// read back as `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Event(Map<String, Value>);

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an event from a JSON object document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Non-empty string value of `key`
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    /// Scalar value of `key` rendered as text, if present
    pub fn get_field(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.0.get(key)? {
            Value::String(s) if !s.is_empty() => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => {
                Some(Cow::Owned(n.to_string()))
            }
            Value::Bool(true) => Some(Cow::Borrowed("true")),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Compared byte-for-byte with the configured secret, so only strings count
    pub fn secret(&self) -> Option<&str> {
        self.get_str("secret")
    }

    pub fn sale_id(&self) -> Option<Cow<'_, str>> {
        self.get_field("sale_id")
    }

    pub fn product_permalink(&self) -> Option<Cow<'_, str>> {
        self.get_field("product_permalink")
    }

    pub fn license_key(&self) -> Option<Cow<'_, str>> {
        self.get_field("license_key")
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Event {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Event {
    type Error = Value;

    /// Fails with the original value when it is not a JSON object
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Event
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }
}
