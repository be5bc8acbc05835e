//! Token handling for the DSWS API.
//!
//! The service authenticates every data call with a token that expires after
//! a while. This crate does not obtain tokens; it holds the token it is
//! given, refuses to send an expired one, and lets the caller swap in a new
//! one.
//!
//! ```
//! use chrono::{Duration, Utc};
//! use dsws_client::{Session, Token};
//!
//! # async fn example() {
//! let session = Session::new(Token::new("token-value", Utc::now() + Duration::hours(24)));
//! assert!(!session.is_expired().await);
//!
//! // later, with a token from your authentication service
//! session.replace(Token::new("next-token", Utc::now() + Duration::hours(24))).await;
//! # }
//! ```

mod session;

pub use session::{Session, Token};
