//! Enumeration types for the DSWS API.
//!
//! Date literals, frequencies, request kinds, instrument hint properties and
//! the thirteen response value tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// Relative date literals understood by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateName {
    /// Base date of the series
    #[serde(rename = "BDATE")]
    BaseDate,
    /// Start of the current week
    #[serde(rename = "SWDATE")]
    StartOfWeek,
    /// Start of the current month
    #[serde(rename = "SMDATE")]
    StartOfMonth,
    /// Start of the current quarter
    #[serde(rename = "SQDATE")]
    StartOfQuarter,
    /// Start of the current year
    #[serde(rename = "SYDATE")]
    StartOfYear,
    /// Latest available date
    #[serde(rename = "LATESTDATE")]
    LatestDate,
    /// Intraday (today)
    #[serde(rename = "TODAY")]
    Intraday,
    /// End of year
    #[serde(rename = "YRE")]
    EndOfYear,
    /// End of month
    #[serde(rename = "MTE")]
    EndOfMonth,
    /// End of quarter
    #[serde(rename = "QTE")]
    EndOfQuarter,
    /// End of week
    #[serde(rename = "WKE")]
    EndOfWeek,
    /// Start of year (period form)
    #[serde(rename = "YRS")]
    YearStart,
    /// Start of month (period form)
    #[serde(rename = "MTS")]
    MonthStart,
    /// Start of quarter (period form)
    #[serde(rename = "QTS")]
    QuarterStart,
    /// Start of week (period form)
    #[serde(rename = "WKS")]
    WeekStart,
    /// Middle of year
    #[serde(rename = "YRM")]
    MiddleOfYear,
    /// Middle of month
    #[serde(rename = "MTM")]
    MiddleOfMonth,
    /// Middle of quarter
    #[serde(rename = "QTM")]
    MiddleOfQuarter,
    /// Middle of week
    #[serde(rename = "WKM")]
    MiddleOfWeek,
}

impl DateName {
    const ALL: [DateName; 19] = [
        DateName::BaseDate,
        DateName::StartOfWeek,
        DateName::StartOfMonth,
        DateName::StartOfQuarter,
        DateName::StartOfYear,
        DateName::LatestDate,
        DateName::Intraday,
        DateName::EndOfYear,
        DateName::EndOfMonth,
        DateName::EndOfQuarter,
        DateName::EndOfWeek,
        DateName::YearStart,
        DateName::MonthStart,
        DateName::QuarterStart,
        DateName::WeekStart,
        DateName::MiddleOfYear,
        DateName::MiddleOfMonth,
        DateName::MiddleOfQuarter,
        DateName::MiddleOfWeek,
    ];

    /// The literal sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            DateName::BaseDate => "BDATE",
            DateName::StartOfWeek => "SWDATE",
            DateName::StartOfMonth => "SMDATE",
            DateName::StartOfQuarter => "SQDATE",
            DateName::StartOfYear => "SYDATE",
            DateName::LatestDate => "LATESTDATE",
            DateName::Intraday => "TODAY",
            DateName::EndOfYear => "YRE",
            DateName::EndOfMonth => "MTE",
            DateName::EndOfQuarter => "QTE",
            DateName::EndOfWeek => "WKE",
            DateName::YearStart => "YRS",
            DateName::MonthStart => "MTS",
            DateName::QuarterStart => "QTS",
            DateName::WeekStart => "WKS",
            DateName::MiddleOfYear => "YRM",
            DateName::MiddleOfMonth => "MTM",
            DateName::MiddleOfQuarter => "QTM",
            DateName::MiddleOfWeek => "WKM",
        }
    }
}

impl FromStr for DateName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateName::ALL
            .iter()
            .find(|name| name.as_str() == s)
            .copied()
            .ok_or_else(|| Error::InvalidInput(format!("Unknown date literal: {}", s)))
    }
}

impl fmt::Display for DateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sampling frequency of a time series request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// Daily
    #[serde(rename = "D")]
    #[default]
    Daily,
    /// Weekly
    #[serde(rename = "W")]
    Weekly,
    /// Monthly
    #[serde(rename = "M")]
    Monthly,
    /// Quarterly
    #[serde(rename = "Q")]
    Quarterly,
    /// Yearly
    #[serde(rename = "Y")]
    Yearly,
    /// Seven-day week
    #[serde(rename = "7D")]
    SevenDays,
    /// Seven-day week, padded
    #[serde(rename = "7DPAD")]
    SevenDaysPadded,
    /// Seven-day Middle Eastern week
    #[serde(rename = "7DME")]
    SevenDaysMiddleEastern,
    /// Seven-day Middle Eastern week, padded
    #[serde(rename = "7DMEPAD")]
    SevenDaysMiddleEasternPadded,
}

impl Frequency {
    /// The code sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "D",
            Frequency::Weekly => "W",
            Frequency::Monthly => "M",
            Frequency::Quarterly => "Q",
            Frequency::Yearly => "Y",
            Frequency::SevenDays => "7D",
            Frequency::SevenDaysPadded => "7DPAD",
            Frequency::SevenDaysMiddleEastern => "7DME",
            Frequency::SevenDaysMiddleEasternPadded => "7DMEPAD",
        }
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "D" => Ok(Frequency::Daily),
            "W" => Ok(Frequency::Weekly),
            "M" => Ok(Frequency::Monthly),
            "Q" => Ok(Frequency::Quarterly),
            "Y" => Ok(Frequency::Yearly),
            "7D" => Ok(Frequency::SevenDays),
            "7DPAD" => Ok(Frequency::SevenDaysPadded),
            "7DME" => Ok(Frequency::SevenDaysMiddleEastern),
            "7DMEPAD" => Ok(Frequency::SevenDaysMiddleEasternPadded),
            other => Err(Error::InvalidInput(format!("Unknown frequency: {}", other))),
        }
    }
}

/// Whether a request asks for a single point in time or a series.
///
/// Serialized as the integer the service expects (`0` / `1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateKind {
    /// One value per instrument and field
    #[default]
    Snapshot,
    /// One value per date in the requested range
    TimeSeries,
}

impl Serialize for DateKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            DateKind::Snapshot => 0,
            DateKind::TimeSeries => 1,
        })
    }
}

impl<'de> Deserialize<'de> for DateKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(DateKind::Snapshot),
            1 => Ok(DateKind::TimeSeries),
            other => Err(serde::de::Error::custom(format!(
                "unknown date kind: {}",
                other
            ))),
        }
    }
}

/// Well-known instrument property names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrumentProperty {
    /// The value names a constituent list (`|L` hint)
    IsList,
    /// The value is an expression (`|E` hint)
    IsExpression,
    /// The value is a set of symbols built from a list
    IsSymbolSet,
    /// Ask the service to return display names
    ReturnName,
}

impl InstrumentProperty {
    /// The property key sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentProperty::IsList => "IsList",
            InstrumentProperty::IsExpression => "IsExpression",
            InstrumentProperty::IsSymbolSet => "IsSymbolSet",
            InstrumentProperty::ReturnName => "ReturnName",
        }
    }
}

/// Tag attached to every symbol value in a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Service-level error; the value is a message
    Error,
    /// No value
    Empty,
    /// Boolean scalar
    Bool,
    /// Integer scalar
    Int,
    /// Date literal scalar
    DateTime,
    /// Floating point scalar
    Double,
    /// String scalar
    String,
    /// Array of booleans
    BoolArray,
    /// Array of integers
    IntArray,
    /// Array of date literals
    DateTimeArray,
    /// Array of floats
    DoubleArray,
    /// Array of strings
    StringArray,
    /// Array of arbitrary objects
    ObjectArray,
}

impl ValueType {
    /// Returns `true` for the array-shaped tags.
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            ValueType::BoolArray
                | ValueType::IntArray
                | ValueType::DateTimeArray
                | ValueType::DoubleArray
                | ValueType::StringArray
                | ValueType::ObjectArray
        )
    }
}

impl TryFrom<u8> for ValueType {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Error> {
        Ok(match code {
            0 => ValueType::Error,
            1 => ValueType::Empty,
            2 => ValueType::Bool,
            3 => ValueType::Int,
            4 => ValueType::DateTime,
            5 => ValueType::Double,
            6 => ValueType::String,
            7 => ValueType::BoolArray,
            8 => ValueType::IntArray,
            9 => ValueType::DateTimeArray,
            10 => ValueType::DoubleArray,
            11 => ValueType::StringArray,
            12 => ValueType::ObjectArray,
            other => {
                return Err(Error::decode("value type", other.to_string(), "unknown tag"))
            }
        })
    }
}

impl From<ValueType> for u8 {
    fn from(value_type: ValueType) -> u8 {
        match value_type {
            ValueType::Error => 0,
            ValueType::Empty => 1,
            ValueType::Bool => 2,
            ValueType::Int => 3,
            ValueType::DateTime => 4,
            ValueType::Double => 5,
            ValueType::String => 6,
            ValueType::BoolArray => 7,
            ValueType::IntArray => 8,
            ValueType::DateTimeArray => 9,
            ValueType::DoubleArray => 10,
            ValueType::StringArray => 11,
            ValueType::ObjectArray => 12,
        }
    }
}

impl Serialize for ValueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8((*self).into())
    }
}

impl<'de> Deserialize<'de> for ValueType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        ValueType::try_from(code).map_err(serde::de::Error::custom)
    }
}
