//! Request models.
//!
//! Every type here is an immutable value object. Size limits imposed by the
//! service are checked when a [`DataRequest`] or [`RequestBundle`] is built;
//! a value that exists is a value the service will accept.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use super::enums::{DateKind, DateName, Frequency, InstrumentProperty};
use super::primitives::StringKvPair;
use crate::{Error, Result};

/// Maximum number of instruments in a single request.
pub const MAX_INSTRUMENTS_PER_REQUEST: usize = 50;
/// Maximum number of data types (fields) in a single request.
pub const MAX_DATATYPES_PER_REQUEST: usize = 50;
/// Maximum number of instrument × field items in a single request.
pub const MAX_ITEMS_PER_REQUEST: usize = 100;
/// Maximum number of requests in a bundle.
pub const MAX_REQUESTS_PER_BUNDLE: usize = 20;
/// Maximum number of instrument × field items across a bundle.
pub const MAX_ITEMS_PER_BUNDLE: usize = 500;

/// One or more instrument identifiers plus hint properties.
///
/// Identifiers are kept as an ordered list and only joined with commas when
/// the instrument is serialized.
///
/// # Example
///
/// ```
/// use dsws_client::models::Instrument;
///
/// let instrument = Instrument::parse("VOD,U:JPM").unwrap();
/// assert_eq!(instrument.identifiers(), ["VOD", "U:JPM"]);
/// assert_eq!(instrument.value(), "VOD,U:JPM");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    identifiers: Vec<String>,
    properties: Vec<StringKvPair>,
}

impl Instrument {
    /// Create an instrument from identifiers, without hint properties.
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identifiers: identifiers.into_iter().map(Into::into).collect(),
            properties: Vec::new(),
        }
    }

    /// Create an instrument from a list of symbols, flagged as a symbol set.
    pub fn from_list<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(identifiers).with_flag(InstrumentProperty::IsSymbolSet)
    }

    /// Parse an instrument string.
    ///
    /// The value is split on commas. A trailing `|L` marks a constituent
    /// list and a trailing `|E` marks an expression. Expressions are split
    /// on commas like any other value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown hint suffix.
    pub fn parse(value: &str) -> Result<Self> {
        let (value, flag) = match value.rsplit_once('|') {
            Some((value, "L")) => (value, Some(InstrumentProperty::IsList)),
            Some((value, "E")) => (value, Some(InstrumentProperty::IsExpression)),
            Some((_, hint)) => {
                return Err(Error::InvalidInput(format!(
                    "Unknown instrument hint: {}",
                    hint
                )))
            }
            None => (value, None),
        };

        let identifiers: Vec<&str> = if value.is_empty() {
            Vec::new()
        } else {
            value.split(',').collect()
        };

        let instrument = Self::new(identifiers);
        Ok(match flag {
            Some(flag) => instrument.with_flag(flag),
            None => instrument,
        })
    }

    /// Ask the service to return display names for the identifiers.
    pub fn with_return_names(self) -> Self {
        self.with_flag(InstrumentProperty::ReturnName)
    }

    /// Add an arbitrary property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.properties.push(StringKvPair::new(key, value));
        self
    }

    fn with_flag(self, flag: InstrumentProperty) -> Self {
        self.with_property(flag.as_str(), true)
    }

    /// The identifiers in request order.
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// The hint properties.
    pub fn properties(&self) -> &[StringKvPair] {
        &self.properties
    }

    /// The comma-joined wire value.
    pub fn value(&self) -> String {
        self.identifiers.join(",")
    }

    /// A copy of this instrument carrying different identifiers.
    pub(crate) fn with_identifiers(&self, identifiers: &[String]) -> Self {
        Self {
            identifiers: identifiers.to_vec(),
            properties: self.properties.clone(),
        }
    }
}

impl Serialize for Instrument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Instrument", 2)?;
        state.serialize_field("Value", &self.value())?;
        state.serialize_field("Properties", &self.properties)?;
        state.end()
    }
}

/// A data type, i.e. a field code such as `P` or `NAME`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataType {
    value: String,
    properties: Vec<StringKvPair>,
}

impl DataType {
    /// Create a data type from a field code.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            value: code.into(),
            properties: Vec::new(),
        }
    }

    /// Ask the service to return the field's display name.
    pub fn with_return_name(self) -> Self {
        self.with_property(InstrumentProperty::ReturnName.as_str(), true)
    }

    /// Add an arbitrary property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.properties.push(StringKvPair::new(key, value));
        self
    }

    /// The field code.
    pub fn code(&self) -> &str {
        &self.value
    }

    /// The properties.
    pub fn properties(&self) -> &[StringKvPair] {
        &self.properties
    }
}

/// A request date: unset, an absolute date, or a relative literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateValue {
    /// Let the service pick its default
    #[default]
    Unset,
    /// An absolute calendar date
    Date(NaiveDate),
    /// A relative date literal
    Named(DateName),
}

impl DateValue {
    /// The string sent on the wire.
    pub fn to_wire(&self) -> String {
        match self {
            DateValue::Unset => String::new(),
            DateValue::Date(date) => date.format("%Y-%m-%d").to_string(),
            DateValue::Named(name) => name.as_str().to_string(),
        }
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        DateValue::Date(date)
    }
}

impl From<DateName> for DateValue {
    fn from(name: DateName) -> Self {
        DateValue::Named(name)
    }
}

impl<T: Into<DateValue>> From<Option<T>> for DateValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl FromStr for DateValue {
    type Err = Error;

    /// Accepts `""`, an ISO date (`2023-04-17`) or a relative literal.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(DateValue::Unset);
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(DateValue::Date(date));
        }
        s.parse::<DateName>().map(DateValue::Named)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl Serialize for DateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

/// Date information of a request.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use dsws_client::models::{DateName, DateSpec, Frequency};
///
/// let series = DateSpec::time_series(
///     NaiveDate::from_ymd_opt(2023, 4, 17).unwrap(),
///     DateName::LatestDate,
///     Frequency::Daily,
/// );
/// assert!(series.frequency().is_some());
///
/// let snapshot = DateSpec::snapshot(DateName::LatestDate);
/// assert!(snapshot.frequency().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DateSpec {
    start: DateValue,
    end: DateValue,
    frequency: Option<Frequency>,
    kind: DateKind,
}

impl DateSpec {
    /// A snapshot at `start`. Snapshots never carry a frequency.
    pub fn snapshot(start: impl Into<DateValue>) -> Self {
        Self {
            start: start.into(),
            end: DateValue::Unset,
            frequency: None,
            kind: DateKind::Snapshot,
        }
    }

    /// A time series between `start` and `end`.
    pub fn time_series(
        start: impl Into<DateValue>,
        end: impl Into<DateValue>,
        frequency: Frequency,
    ) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            frequency: Some(frequency),
            kind: DateKind::TimeSeries,
        }
    }

    /// Start date.
    pub fn start(&self) -> DateValue {
        self.start
    }

    /// End date.
    pub fn end(&self) -> DateValue {
        self.end
    }

    /// Frequency (always `None` for snapshots).
    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    /// Request kind.
    pub fn kind(&self) -> DateKind {
        self.kind
    }
}

/// A single data request: instruments × fields over a date spec.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataRequest {
    instrument: Instrument,
    data_types: Vec<DataType>,
    date: DateSpec,
    tag: Option<String>,
}

impl DataRequest {
    /// Build a request, checking the per-request limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when there are no data types, more than
    /// 50 instruments, more than 50 data types, or more than 100
    /// instrument × field items.
    pub fn new(
        instrument: Instrument,
        data_types: Vec<DataType>,
        date: DateSpec,
        tag: Option<String>,
    ) -> Result<Self> {
        let n_instruments = instrument.identifiers().len();
        let n_types = data_types.len();

        if n_types == 0 {
            return Err(Error::Validation(
                "Request must contain at least one data type".to_string(),
            ));
        }
        if n_instruments > MAX_INSTRUMENTS_PER_REQUEST {
            return Err(Error::Validation(format!(
                "Request contains more than {} instruments ({})",
                MAX_INSTRUMENTS_PER_REQUEST, n_instruments
            )));
        }
        if n_types > MAX_DATATYPES_PER_REQUEST {
            return Err(Error::Validation(format!(
                "Request contains more than {} data types ({})",
                MAX_DATATYPES_PER_REQUEST, n_types
            )));
        }
        if n_instruments * n_types > MAX_ITEMS_PER_REQUEST {
            return Err(Error::Validation(format!(
                "Request contains more than {} items ({})",
                MAX_ITEMS_PER_REQUEST,
                n_instruments * n_types
            )));
        }

        Ok(Self {
            instrument,
            data_types,
            date,
            tag,
        })
    }

    /// The instrument.
    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// The data types.
    pub fn data_types(&self) -> &[DataType] {
        &self.data_types
    }

    /// The date spec.
    pub fn date(&self) -> &DateSpec {
        &self.date
    }

    /// The tag echoed back by the service.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Number of instrument × field items.
    pub fn items(&self) -> usize {
        self.instrument.identifiers().len() * self.data_types.len()
    }
}

/// A group of requests sent in a single `GetDataBundle` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBundle {
    requests: Vec<DataRequest>,
    properties: Vec<StringKvPair>,
}

impl RequestBundle {
    /// Build a bundle, checking the per-bundle limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty bundle, more than 20
    /// requests, or more than 500 items in total.
    pub fn new(requests: Vec<DataRequest>) -> Result<Self> {
        if requests.is_empty() {
            return Err(Error::Validation(
                "Bundle must contain at least one request".to_string(),
            ));
        }
        if requests.len() > MAX_REQUESTS_PER_BUNDLE {
            return Err(Error::Validation(format!(
                "Bundle contains more than {} requests ({})",
                MAX_REQUESTS_PER_BUNDLE,
                requests.len()
            )));
        }
        let total_items: usize = requests.iter().map(DataRequest::items).sum();
        if total_items > MAX_ITEMS_PER_BUNDLE {
            return Err(Error::Validation(format!(
                "Bundle contains more than {} items ({})",
                MAX_ITEMS_PER_BUNDLE, total_items
            )));
        }

        Ok(Self {
            requests,
            properties: Vec::new(),
        })
    }

    /// Add a property shared by every request in the bundle.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.properties.push(StringKvPair::new(key, value));
        self
    }

    /// The requests.
    pub fn requests(&self) -> &[DataRequest] {
        &self.requests
    }

    /// The shared properties.
    pub fn properties(&self) -> &[StringKvPair] {
        &self.properties
    }

    /// Number of instrument × field items across all requests.
    pub fn items(&self) -> usize {
        self.requests.iter().map(DataRequest::items).sum()
    }
}

/// Wire envelope for the `GetData` endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetDataRequest<'a> {
    /// Session token
    pub token_value: &'a str,
    /// The request
    pub data_request: &'a DataRequest,
    /// Call-level properties
    pub properties: Vec<StringKvPair>,
}

/// Wire envelope for the `GetDataBundle` endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetDataBundleRequest<'a> {
    /// Session token
    pub token_value: &'a str,
    /// The requests of the bundle
    pub data_requests: &'a [DataRequest],
    /// Call-level properties
    pub properties: Vec<StringKvPair>,
}
