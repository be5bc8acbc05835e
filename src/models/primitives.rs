//! Primitive wire types shared by requests and responses.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A key/value pair as used by the service for properties and metadata.
///
/// Keys are optional on the wire; values may be any JSON scalar (the service
/// sends strings, booleans and occasionally `null`).
///
/// # Example
///
/// ```
/// use dsws_client::models::StringKvPair;
///
/// let pair = StringKvPair::new("ReturnName", true);
/// assert_eq!(pair.key.as_deref(), Some("ReturnName"));
/// assert_eq!(pair.value_string().as_deref(), Some("true"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StringKvPair {
    /// Property name
    #[serde(default)]
    pub key: Option<String>,
    /// Property value
    #[serde(default)]
    pub value: JsonValue,
}

impl StringKvPair {
    /// Create a new pair from a key and any JSON-convertible value.
    pub fn new(key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            key: Some(key.into()),
            value: value.into(),
        }
    }

    /// Render the value as a string.
    ///
    /// Returns `None` for `null`; numbers and booleans are rendered with
    /// their JSON spelling.
    pub fn value_string(&self) -> Option<String> {
        match &self.value {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// The key used when the pair is folded into a lookup map: the pair's key,
    /// or its value when the key is missing or empty.
    pub fn map_key(&self) -> Option<String> {
        match self.key.as_deref() {
            Some(key) if !key.is_empty() => Some(key.to_string()),
            _ => self.value_string(),
        }
    }
}
