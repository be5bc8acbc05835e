//! HTTP client and service layer for the DSWS API.
//!
//! This module provides the main entry point [`DswsClient`] and its
//! configuration.
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use dsws_client::{ClientConfig, DswsClient, Token};
//!
//! # async fn example() -> dsws_client::Result<()> {
//! let token = Token::from_date_literal("token-value", "/Date(1893456000000)/")?;
//! let client = DswsClient::new(token, ClientConfig::from_env()?)?;
//!
//! let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
//! let parsed = client
//!     .fetch_snapshot_data(&["VOD", "U:JPM"], &["NAME", "ISIN"], start, Some("names"))
//!     .await?;
//! println!("{} records, {} errors", parsed.records.len(), parsed.errors.len());
//! # Ok(())
//! # }
//! ```

mod config;
mod http;

pub use config::{ClientConfig, DEFAULT_BASE_URL, SERVICE_PATH};
pub use http::DswsClient;
