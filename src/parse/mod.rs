//! Flattening of data responses into records.
//!
//! The service answers column-wise: per field, per symbol, a value or an
//! array of values along the response's date axis. This module turns that
//! into one [`Record`] per `(symbol, date)` pair, collects service-level
//! errors separately, and merges metadata across partial responses.
//!
//! # Example
//!
//! ```
//! use dsws_client::models::DataResponse;
//! use dsws_client::parse::{aggregate, ParseOptions};
//!
//! let response: DataResponse = serde_json::from_value(serde_json::json!({
//!     "DataTypeValues": [{
//!         "DataType": "P",
//!         "SymbolValues": [{"Symbol": "VOD", "Currency": "£", "Type": 5, "Value": 92.71}]
//!     }],
//!     "Dates": ["/Date(1681689600000+0000)/"]
//! }))?;
//!
//! let parsed = aggregate([&response], ParseOptions::default())?;
//! assert_eq!(parsed.records.len(), 1);
//! assert_eq!(parsed.records[0].get("P").and_then(|v| v.as_f64()), Some(92.71));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod aggregate;
mod flatten;

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::codec::Value;
use crate::models::{DataResponse, StringKvPair};

pub use aggregate::aggregate;
pub use flatten::flatten;

/// Options controlling how values are converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Map the string literals `"NA"`, `"N"` and `"Y"` to null, false and true.
    pub process_strings: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            process_strings: true,
        }
    }
}

impl ParseOptions {
    /// Keep string values exactly as returned.
    pub fn raw_strings() -> Self {
        Self {
            process_strings: false,
        }
    }
}

/// All field values of one symbol at one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Instrument identifier
    pub symbol: String,
    /// Point on the date axis
    pub date: DateTime<FixedOffset>,
    /// Field code to value
    #[serde(flatten)]
    pub values: BTreeMap<String, Value>,
}

impl Record {
    /// The value of a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }
}

/// A service-level error reported for one field and symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field code
    pub field: String,
    /// Instrument identifier
    pub symbol: String,
    /// Message returned by the service
    pub message: String,
}

/// Metadata collected from one or more responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Meta {
    /// Field code to display name
    pub data_type_names: BTreeMap<String, Option<String>>,
    /// Symbol to display name
    pub symbol_names: BTreeMap<String, Option<String>>,
    /// Additional response properties
    pub additional_responses: BTreeMap<String, Option<String>>,
    /// Tags echoed by the responses
    pub tags: BTreeSet<String>,
    /// Symbol to field to currency
    pub currencies: BTreeMap<String, BTreeMap<String, Option<String>>>,
}

impl Meta {
    /// Collect the name maps and tag of a response.
    ///
    /// Currencies are filled in while values are flattened.
    pub fn from_response(response: &DataResponse) -> Self {
        let mut tags = BTreeSet::new();
        if let Some(tag) = response.tag.as_deref().filter(|t| !t.is_empty()) {
            tags.insert(tag.to_string());
        }

        Self {
            data_type_names: pairs_to_map(response.data_type_names.as_deref()),
            symbol_names: pairs_to_map(response.symbol_names.as_deref()),
            additional_responses: pairs_to_map(response.additional_responses.as_deref()),
            tags,
            currencies: BTreeMap::new(),
        }
    }

    /// Merge two metas into a new one.
    ///
    /// Name maps take `other`'s entry on collision; tags are unioned;
    /// currencies are merged per symbol.
    pub fn merge(mut self, other: Meta) -> Meta {
        self.data_type_names.extend(other.data_type_names);
        self.symbol_names.extend(other.symbol_names);
        self.additional_responses.extend(other.additional_responses);
        self.tags.extend(other.tags);
        for (symbol, fields) in other.currencies {
            self.currencies.entry(symbol).or_default().extend(fields);
        }
        self
    }
}

fn pairs_to_map(pairs: Option<&[StringKvPair]>) -> BTreeMap<String, Option<String>> {
    pairs
        .unwrap_or_default()
        .iter()
        .filter_map(|pair| pair.map_key().map(|key| (key, pair.value_string())))
        .collect()
}

/// Records, errors and metadata of one or more responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedResponse {
    /// One record per `(symbol, date)`
    pub records: Vec<Record>,
    /// Service-level errors
    pub errors: Vec<FieldError>,
    /// Merged metadata
    pub meta: Meta,
}

impl ParsedResponse {
    /// Append another result to this one.
    pub fn merge(self, other: ParsedResponse) -> ParsedResponse {
        let ParsedResponse {
            mut records,
            mut errors,
            meta,
        } = self;
        records.extend(other.records);
        errors.extend(other.errors);
        ParsedResponse {
            records,
            errors,
            meta: meta.merge(other.meta),
        }
    }

    /// Returns `true` when there are neither records nor errors.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.errors.is_empty()
    }
}

impl FromIterator<ParsedResponse> for ParsedResponse {
    fn from_iter<I: IntoIterator<Item = ParsedResponse>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ParsedResponse::default(), ParsedResponse::merge)
    }
}
