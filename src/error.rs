//! Error types for the DSWS client.
//!
//! A single error enum covers every failure mode of the crate, from limit
//! violations caught while building requests to malformed responses and
//! transport failures.

use thiserror::Error;

/// A specialized `Result` type for DSWS operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all DSWS operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The service answered with a non-success status code
    #[error("API error: status={status}, message={message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the service
        message: String,
    },

    /// A request or bundle exceeds one of the service limits
    #[error("Validation error: {0}")]
    Validation(String),

    /// A single response value could not be decoded
    #[error("Cannot decode {kind} from {value:?}: {message}")]
    Decode {
        /// The value kind that was being decoded
        kind: &'static str,
        /// The offending raw value
        value: String,
        /// Why decoding failed
        message: String,
    },

    /// A data response cannot be flattened (missing dates, shape mismatch)
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid input provided by the caller
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The session token has expired and must be replaced
    #[error("Session expired; a new token is required")]
    SessionExpired,

    /// Request timed out
    #[error("Request timeout")]
    Timeout,

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` if this error is potentially transient and the
    /// operation could be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::Timeout => true,
            Error::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::SessionExpired => true,
            Error::Api { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (limit violation, bad input, bad configuration).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 400 && *status < 500,
            Error::Validation(_) | Error::InvalidInput(_) | Error::Config(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if a data response was rejected while flattening.
    pub fn is_invalid_response(&self) -> bool {
        matches!(self, Error::InvalidResponse(_))
    }

    pub(crate) fn decode(
        kind: &'static str,
        value: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        Error::Decode {
            kind,
            value: value.into(),
            message: message.to_string(),
        }
    }
}
