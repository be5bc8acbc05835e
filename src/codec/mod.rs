//! Decoding of response values and date literals.

mod date;
mod value;

pub use date::{decode_date_literal, encode_date_literal};
pub use value::{process_string_value, Decoded, Payload, SymbolValue, Value};
