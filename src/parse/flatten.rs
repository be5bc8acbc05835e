use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use super::{FieldError, Meta, ParseOptions, ParsedResponse, Record};
use crate::codec::{Decoded, Payload, SymbolValue, Value};
use crate::models::DataResponse;
use crate::{Error, Result};

/// Flatten a single data response.
///
/// # Errors
///
/// - [`Error::InvalidResponse`] when the response has no dates, when an
///   array's length differs from the number of dates, or when a scalar value
///   comes with more than one date.
/// - [`Error::Decode`] when a value or date literal cannot be decoded.
pub fn flatten(response: &DataResponse, options: ParseOptions) -> Result<ParsedResponse> {
    let dates = match response.decoded_dates()? {
        Some(dates) if !dates.is_empty() => dates,
        _ => {
            return Err(Error::InvalidResponse(
                "Response does not contain dates; the request was probably invalid".to_string(),
            ))
        }
    };

    debug!(
        fields = response.data_type_values.len(),
        dates = dates.len(),
        tag = response.tag.as_deref().unwrap_or_default(),
        "flattening response"
    );

    let mut meta = Meta::from_response(response);
    let mut table = RecordTable::default();
    let mut errors = Vec::new();

    for data_type_value in &response.data_type_values {
        let field = data_type_value.data_type.as_str();
        for raw in &data_type_value.symbol_values {
            let value = SymbolValue::decode(raw)?;
            meta.currencies
                .entry(value.symbol.clone())
                .or_default()
                .insert(field.to_string(), value.currency.clone());
            process_symbol_value(&mut table, &mut errors, field, &dates, value, options)?;
        }
    }

    Ok(ParsedResponse {
        records: table.into_records(),
        errors,
        meta,
    })
}

fn process_symbol_value(
    table: &mut RecordTable,
    errors: &mut Vec<FieldError>,
    field: &str,
    dates: &[DateTime<FixedOffset>],
    value: SymbolValue,
    options: ParseOptions,
) -> Result<()> {
    let SymbolValue {
        symbol, payload, ..
    } = value;

    // the service does not say which date an error belongs to, so every
    // date slot gets a null
    let is_error = match &payload {
        Payload::Error(message) => {
            errors.push(FieldError {
                field: field.to_string(),
                symbol: symbol.clone(),
                message: message.clone(),
            });
            true
        }
        _ => false,
    };

    match payload.into_decoded(options.process_strings) {
        Decoded::Series(values) => {
            if values.len() != dates.len() {
                return Err(Error::InvalidResponse(format!(
                    "Number of values ({}) does not match number of dates ({}) for {} / {}",
                    values.len(),
                    dates.len(),
                    symbol,
                    field
                )));
            }
            for (date, value) in dates.iter().zip(values) {
                table.upsert(&symbol, *date, field, value);
            }
        }
        Decoded::Scalar(_) if is_error => {
            for date in dates {
                table.upsert(&symbol, *date, field, Value::Null);
            }
        }
        Decoded::Scalar(value) => {
            if dates.len() > 1 {
                return Err(Error::InvalidResponse(format!(
                    "Single value found for {} dates for {} / {}",
                    dates.len(),
                    symbol,
                    field
                )));
            }
            table.upsert(&symbol, dates[0], field, value);
        }
    }

    Ok(())
}

/// Records keyed by `(symbol, date)`, kept in first-seen order.
#[derive(Default)]
struct RecordTable {
    index: HashMap<(String, DateTime<FixedOffset>), usize>,
    records: Vec<Record>,
}

impl RecordTable {
    fn upsert(&mut self, symbol: &str, date: DateTime<FixedOffset>, field: &str, value: Value) {
        let records = &mut self.records;
        let slot = *self
            .index
            .entry((symbol.to_string(), date))
            .or_insert_with(|| {
                records.push(Record {
                    symbol: symbol.to_string(),
                    date,
                    values: BTreeMap::new(),
                });
                records.len() - 1
            });
        self.records[slot].values.insert(field.to_string(), value);
    }

    fn into_records(self) -> Vec<Record> {
        self.records
    }
}
