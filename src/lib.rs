//! # dsws-client
//!
//! A Rust client for the Datastream Web Service (DSWS) data API.
//!
//! The service caps how many instruments and fields a single request or
//! bundle may carry, and answers column-wise with dates encoded as
//! `/Date(ms±HHMM)/` literals. This crate hides both:
//!
//! - **Batching**: split any number of identifiers into bundles within the
//!   service limits ([`bundle_identifiers`])
//! - **Decoding**: typed values for every wire value tag ([`codec`])
//! - **Flattening**: one record per `(symbol, date)` with service errors
//!   collected separately ([`flatten`], [`aggregate`])
//! - **Transport**: bounded-concurrency fetching over HTTP ([`DswsClient`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::{Duration, NaiveDate, Utc};
//! use dsws_client::{ClientConfig, DswsClient, Frequency, Token};
//!
//! #[tokio::main]
//! async fn main() -> dsws_client::Result<()> {
//!     let token = Token::new("token-value", Utc::now() + Duration::hours(24));
//!     let client = DswsClient::new(token, ClientConfig::from_env()?)?;
//!
//!     let parsed = client
//!         .fetch_timeseries_data(
//!             &["VOD"],
//!             &["P"],
//!             NaiveDate::from_ymd_opt(2023, 4, 17).unwrap(),
//!             NaiveDate::from_ymd_opt(2023, 4, 24).unwrap(),
//!             Frequency::Daily,
//!             Some("daily-prices"),
//!         )
//!         .await?;
//!
//!     for record in &parsed.records {
//!         println!("{} {}: {:?}", record.symbol, record.date, record.get("P"));
//!     }
//!     for error in &parsed.errors {
//!         eprintln!("{} / {}: {}", error.symbol, error.field, error.message);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Offline planning
//!
//! ```rust
//! use dsws_client::bundle_identifiers;
//! use dsws_client::models::Instrument;
//!
//! let ids: Vec<String> = (0..1200).map(|i| format!("ID{}", i)).collect();
//! let bundles = bundle_identifiers(&Instrument::from_list(&ids), 2)?;
//! assert_eq!(bundles.len(), 5);
//! # Ok::<(), dsws_client::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod batching;
pub mod client;
pub mod codec;
pub mod error;
pub mod models;
pub mod parse;

// Re-export primary types at crate root for convenience
pub use auth::{Session, Token};
pub use batching::{build_bundles, bundle_identifiers};
pub use client::{ClientConfig, DswsClient};
pub use error::{Error, Result};
pub use models::{DateName, DateSpec, DateValue, Frequency, Instrument};
pub use parse::{aggregate, flatten, ParseOptions, ParsedResponse};

/// Prelude module for convenient imports.
///
/// ```rust
/// use dsws_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::{Session, Token};
    pub use crate::batching::{build_bundles, bundle_identifiers};
    pub use crate::client::{ClientConfig, DswsClient};
    pub use crate::codec::Value;
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        // Requests
        DataRequest, DataType, DateSpec, DateValue, Instrument, RequestBundle,
        // Enums
        DateKind, DateName, Frequency, ValueType,
        // Responses
        DataResponse, GetDataBundleResponse, GetDataResponse,
    };
    pub use crate::parse::{
        aggregate, flatten, FieldError, Meta, ParseOptions, ParsedResponse, Record,
    };
}
