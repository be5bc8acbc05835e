//! Data models for the DSWS API.
//!
//! - [`primitives`] - Key/value pairs shared by requests and responses
//! - [`enums`] - Date literals, frequencies, kinds and value tags
//! - [`request`] - Instruments, data types, dates, requests and bundles
//! - [`response`] - Wire shapes of data responses

pub mod enums;
pub mod primitives;
pub mod request;
pub mod response;

pub use enums::*;
pub use primitives::*;
pub use request::*;
pub use response::*;
