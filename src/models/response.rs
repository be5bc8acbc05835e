//! Response models as decoded from the wire.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::enums::ValueType;
use super::primitives::StringKvPair;
use crate::codec::decode_date_literal;
use crate::Result;

/// A tagged value for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SymbolResponseValue {
    /// Instrument identifier
    pub symbol: String,
    /// Currency code
    #[serde(default)]
    pub currency: Option<String>,
    /// Value tag
    #[serde(rename = "Type")]
    pub value_type: ValueType,
    /// Raw payload, shaped according to the tag
    #[serde(default)]
    pub value: JsonValue,
}

/// All symbol values returned for one data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataTypeResponseValue {
    /// Field code
    pub data_type: String,
    /// One entry per symbol
    #[serde(default)]
    pub symbol_values: Vec<SymbolResponseValue>,
}

/// The response to a single data request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct DataResponse {
    /// Values per data type
    pub data_type_values: Vec<DataTypeResponseValue>,
    /// Date axis as date literals; missing or empty for rejected requests
    pub dates: Option<Vec<String>>,
    /// Display names of the data types
    pub data_type_names: Option<Vec<StringKvPair>>,
    /// Display names of the symbols
    pub symbol_names: Option<Vec<StringKvPair>>,
    /// Extra metadata such as the effective frequency
    pub additional_responses: Option<Vec<StringKvPair>>,
    /// Tag echoed from the request
    pub tag: Option<String>,
}

impl DataResponse {
    /// Decode the date axis.
    ///
    /// Returns `Ok(None)` when the response carries no dates.
    pub fn decoded_dates(&self) -> Result<Option<Vec<DateTime<FixedOffset>>>> {
        match &self.dates {
            None => Ok(None),
            Some(dates) => dates
                .iter()
                .map(|d| decode_date_literal(d))
                .collect::<Result<Vec<_>>>()
                .map(Some),
        }
    }
}

/// Envelope returned by the `GetData` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetDataResponse {
    /// The data response
    pub data_response: DataResponse,
    /// Call-level properties
    #[serde(default)]
    pub properties: Option<Vec<StringKvPair>>,
}

/// Envelope returned by the `GetDataBundle` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetDataBundleResponse {
    /// One data response per request of the bundle
    #[serde(default)]
    pub data_responses: Vec<DataResponse>,
    /// Call-level properties
    #[serde(default)]
    pub properties: Option<Vec<StringKvPair>>,
}
