//! Value codec.
//!
//! Turns the tagged `(Type, Value)` pairs of a response into a closed sum
//! type, and that into the [`Value`]s stored in flattened records.

use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use super::date::decode_date_literal;
use crate::models::{SymbolResponseValue, ValueType};
use crate::{Error, Result};

/// A decoded value as stored in a flattened record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Double(f64),
    /// String
    String(String),
    /// Timestamp with its UTC offset
    DateTime(DateTime<FixedOffset>),
    /// Raw JSON passed through from an object array
    Object(JsonValue),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The value as a float, if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// The value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::DateTime(v)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::String(s) => serializer.serialize_str(s),
            Value::DateTime(d) => serializer.serialize_str(&d.to_rfc3339()),
            Value::Object(json) => json.serialize(serializer),
        }
    }
}

/// Payload of a symbol value, one variant per response tag.
///
/// `None` elements stand for JSON `null` entries, which the service uses for
/// dates without data.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Service-level error with its message
    Error(String),
    /// No value
    Empty,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Timestamp
    DateTime(DateTime<FixedOffset>),
    /// Float
    Double(f64),
    /// String
    String(String),
    /// Booleans, one per date
    BoolArray(Vec<Option<bool>>),
    /// Integers, one per date
    IntArray(Vec<Option<i64>>),
    /// Timestamps, one per date
    DateTimeArray(Vec<Option<DateTime<FixedOffset>>>),
    /// Floats, one per date
    DoubleArray(Vec<Option<f64>>),
    /// Strings, one per date
    StringArray(Vec<Option<String>>),
    /// Heterogeneous objects, passed through untouched
    ObjectArray(Vec<JsonValue>),
}

/// Shape of a payload once converted to record values.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A single value
    Scalar(Value),
    /// One value per date
    Series(Vec<Value>),
}

impl Payload {
    /// Decode a raw payload according to its tag.
    ///
    /// A `null` scalar decodes to [`Payload::Empty`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] with the offending raw value when a boolean,
    /// integer, float or date literal cannot be parsed, or when an array tag
    /// carries something other than an array.
    pub fn decode(value_type: ValueType, raw: &JsonValue) -> Result<Self> {
        if raw.is_null() && !value_type.is_array() && value_type != ValueType::Error {
            return Ok(Payload::Empty);
        }

        Ok(match value_type {
            ValueType::Error => Payload::Error(error_message(raw)),
            ValueType::Empty => Payload::Empty,
            ValueType::Bool => Payload::Bool(required(decode_bool(raw)?, "bool", raw)?),
            ValueType::Int => Payload::Int(required(decode_int(raw)?, "int", raw)?),
            ValueType::DateTime => {
                Payload::DateTime(required(decode_datetime(raw)?, "date", raw)?)
            }
            ValueType::Double => Payload::Double(required(decode_double(raw)?, "double", raw)?),
            ValueType::String => Payload::String(required(decode_string(raw), "string", raw)?),
            ValueType::BoolArray => Payload::BoolArray(decode_array(raw, decode_bool)?),
            ValueType::IntArray => Payload::IntArray(decode_array(raw, decode_int)?),
            ValueType::DateTimeArray => {
                Payload::DateTimeArray(decode_array(raw, decode_datetime)?)
            }
            ValueType::DoubleArray => Payload::DoubleArray(decode_array(raw, decode_double)?),
            ValueType::StringArray => {
                Payload::StringArray(decode_array(raw, |v| Ok(decode_string(v)))?)
            }
            ValueType::ObjectArray => Payload::ObjectArray(match raw {
                JsonValue::Array(items) => items.clone(),
                JsonValue::Null => Vec::new(),
                other => vec![other.clone()],
            }),
        })
    }

    /// Returns `true` for a service-level error.
    pub fn is_error(&self) -> bool {
        matches!(self, Payload::Error(_))
    }

    /// The error message, if this is a service-level error.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Payload::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Convert into record values.
    ///
    /// With `process_strings`, scalar strings go through
    /// [`process_string_value`]. Errors become [`Value::Null`].
    pub fn into_decoded(self, process_strings: bool) -> Decoded {
        fn series<T: Into<Value>>(items: Vec<Option<T>>) -> Decoded {
            Decoded::Series(items.into_iter().map(Value::from).collect())
        }

        match self {
            Payload::Error(_) | Payload::Empty => Decoded::Scalar(Value::Null),
            Payload::Bool(v) => Decoded::Scalar(Value::Bool(v)),
            Payload::Int(v) => Decoded::Scalar(Value::Int(v)),
            Payload::DateTime(v) => Decoded::Scalar(Value::DateTime(v)),
            Payload::Double(v) => Decoded::Scalar(Value::Double(v)),
            Payload::String(s) if process_strings => Decoded::Scalar(process_string_value(s)),
            Payload::String(s) => Decoded::Scalar(Value::String(s)),
            Payload::BoolArray(items) => series(items),
            Payload::IntArray(items) => series(items),
            Payload::DateTimeArray(items) => series(items),
            Payload::DoubleArray(items) => series(items),
            Payload::StringArray(items) => series(items),
            Payload::ObjectArray(items) => {
                Decoded::Series(items.into_iter().map(Value::Object).collect())
            }
        }
    }
}

/// A decoded symbol value.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolValue {
    /// Instrument identifier
    pub symbol: String,
    /// Currency code, when the service reports one
    pub currency: Option<String>,
    /// Decoded payload
    pub payload: Payload,
}

impl SymbolValue {
    /// Decode a wire value.
    pub fn decode(raw: &SymbolResponseValue) -> Result<Self> {
        Ok(Self {
            symbol: raw.symbol.clone(),
            currency: raw.currency.clone(),
            payload: Payload::decode(raw.value_type, &raw.value)?,
        })
    }
}

/// Post-process a string value.
///
/// The service uses the string channel for tri-state flags: `"NA"` becomes
/// null, `"N"` false and `"Y"` true. Anything else is kept.
pub fn process_string_value(value: String) -> Value {
    match value.as_str() {
        "NA" => Value::Null,
        "N" => Value::Bool(false),
        "Y" => Value::Bool(true),
        _ => Value::String(value),
    }
}

fn required<T>(value: Option<T>, kind: &'static str, raw: &JsonValue) -> Result<T> {
    value.ok_or_else(|| Error::decode(kind, raw.to_string(), "missing value"))
}

fn error_message(raw: &JsonValue) -> String {
    match raw {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn decode_array<T>(
    raw: &JsonValue,
    decode: impl Fn(&JsonValue) -> Result<Option<T>>,
) -> Result<Vec<Option<T>>> {
    match raw {
        JsonValue::Array(items) => items.iter().map(decode).collect(),
        JsonValue::Null => Ok(Vec::new()),
        other => Err(Error::decode("array", other.to_string(), "expected an array")),
    }
}

fn decode_bool(raw: &JsonValue) -> Result<Option<bool>> {
    match raw {
        JsonValue::Null => Ok(None),
        JsonValue::Bool(b) => Ok(Some(*b)),
        JsonValue::String(s) => match s.as_str() {
            "Y" | "true" | "True" => Ok(Some(true)),
            "N" | "false" | "False" => Ok(Some(false)),
            _ => Err(Error::decode("bool", s.as_str(), "unknown boolean literal")),
        },
        other => Err(Error::decode("bool", other.to_string(), "unknown boolean literal")),
    }
}

fn decode_int(raw: &JsonValue) -> Result<Option<i64>> {
    match raw {
        JsonValue::Null => Ok(None),
        JsonValue::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| Error::decode("int", n.to_string(), "not an integer")),
        JsonValue::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::decode("int", s.as_str(), e)),
        other => Err(Error::decode("int", other.to_string(), "not an integer")),
    }
}

fn decode_double(raw: &JsonValue) -> Result<Option<f64>> {
    match raw {
        JsonValue::Null => Ok(None),
        JsonValue::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| Error::decode("double", n.to_string(), "not a float")),
        JsonValue::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::decode("double", s.as_str(), e)),
        other => Err(Error::decode("double", other.to_string(), "not a float")),
    }
}

fn decode_string(raw: &JsonValue) -> Option<String> {
    match raw {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn decode_datetime(raw: &JsonValue) -> Result<Option<DateTime<FixedOffset>>> {
    match raw {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) => decode_date_literal(s).map(Some),
        other => Err(Error::decode("date", other.to_string(), "expected a date literal")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_bool_literals() {
        for literal in ["Y", "true", "True"] {
            assert_eq!(
                Payload::decode(ValueType::Bool, &json!(literal)).unwrap(),
                Payload::Bool(true)
            );
        }
        for literal in ["N", "false", "False"] {
            assert_eq!(
                Payload::decode(ValueType::Bool, &json!(literal)).unwrap(),
                Payload::Bool(false)
            );
        }
        let err = Payload::decode(ValueType::Bool, &json!("maybe")).unwrap_err();
        assert!(matches!(err, Error::Decode { kind: "bool", .. }));
    }

    #[test]
    fn test_decode_numbers() {
        assert_eq!(
            Payload::decode(ValueType::Int, &json!(42)).unwrap(),
            Payload::Int(42)
        );
        assert_eq!(
            Payload::decode(ValueType::Int, &json!("17")).unwrap(),
            Payload::Int(17)
        );
        assert_eq!(
            Payload::decode(ValueType::Double, &json!(92.71)).unwrap(),
            Payload::Double(92.71)
        );
        assert!(Payload::decode(ValueType::Int, &json!("4.5x")).is_err());
        assert!(Payload::decode(ValueType::Double, &json!("abc")).is_err());
    }

    #[test]
    fn test_decode_arrays_keep_order_and_nulls() {
        let payload =
            Payload::decode(ValueType::DoubleArray, &json!([1.5, null, 3.0])).unwrap();
        assert_eq!(payload, Payload::DoubleArray(vec![Some(1.5), None, Some(3.0)]));

        match payload.into_decoded(true) {
            Decoded::Series(values) => {
                assert_eq!(values, vec![Value::Double(1.5), Value::Null, Value::Double(3.0)])
            }
            other => panic!("expected series, got {:?}", other),
        }

        assert!(Payload::decode(ValueType::IntArray, &json!([1, "x"])).is_err());
        assert!(Payload::decode(ValueType::IntArray, &json!(5)).is_err());
    }

    #[test]
    fn test_decode_datetime_array() {
        let payload = Payload::decode(
            ValueType::DateTimeArray,
            &json!(["/Date(1681689600000+0000)/", null]),
        )
        .unwrap();
        match payload {
            Payload::DateTimeArray(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].unwrap().timestamp_millis(), 1681689600000);
                assert!(items[1].is_none());
            }
            other => panic!("expected date array, got {:?}", other),
        }
    }

    #[test]
    fn test_error_and_empty() {
        let payload = Payload::decode(ValueType::Error, &json!("$$\"ER\", E100")).unwrap();
        assert!(payload.is_error());
        assert_eq!(payload.error_message(), Some("$$\"ER\", E100"));
        assert_eq!(payload.into_decoded(true), Decoded::Scalar(Value::Null));

        assert_eq!(
            Payload::decode(ValueType::Double, &JsonValue::Null).unwrap(),
            Payload::Empty
        );
    }

    #[test]
    fn test_object_array_passes_through() {
        let raw = json!([{"a": 1}, "b"]);
        let payload = Payload::decode(ValueType::ObjectArray, &raw).unwrap();
        assert_eq!(payload, Payload::ObjectArray(vec![json!({"a": 1}), json!("b")]));
    }

    #[test]
    fn test_process_string_value() {
        assert_eq!(process_string_value("NA".into()), Value::Null);
        assert_eq!(process_string_value("N".into()), Value::Bool(false));
        assert_eq!(process_string_value("Y".into()), Value::Bool(true));
        assert_eq!(process_string_value("TEST".into()), Value::String("TEST".into()));
    }

    #[test]
    fn test_string_processing_can_be_disabled() {
        let payload = Payload::decode(ValueType::String, &json!("Y")).unwrap();
        assert_eq!(
            payload.clone().into_decoded(true),
            Decoded::Scalar(Value::Bool(true))
        );
        assert_eq!(
            payload.into_decoded(false),
            Decoded::Scalar(Value::String("Y".into()))
        );
    }

    #[test]
    fn test_value_serializes_plainly() {
        let values = vec![Value::Null, Value::Int(3), Value::String("x".into())];
        assert_eq!(serde_json::to_value(&values).unwrap(), json!([null, 3, "x"]));
    }
}
