//! Session token holder.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::codec::decode_date_literal;
use crate::{Error, Result};

/// Grace period after expiry during which a token is still considered valid.
const EXPIRY_GRACE_SECS: i64 = 60;

/// A token issued by the service, with its expiry.
#[derive(Clone)]
pub struct Token {
    value: SecretString,
    expiry: DateTime<Utc>,
}

impl Token {
    /// Create a token from its value and expiry.
    pub fn new(value: impl Into<String>, expiry: DateTime<Utc>) -> Self {
        Self {
            value: SecretString::from(value.into()),
            expiry,
        }
    }

    /// Create a token whose expiry is given as a date literal, as returned
    /// in the `TokenExpiry` field of the service.
    pub fn from_date_literal(value: impl Into<String>, expiry: &str) -> Result<Self> {
        let expiry: DateTime<FixedOffset> = decode_date_literal(expiry)?;
        Ok(Self::new(value, expiry.with_timezone(&Utc)))
    }

    /// Expiry time.
    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    /// Returns `true` once the expiry plus a one-minute grace period has
    /// passed.
    pub fn is_expired(&self) -> bool {
        self.expiry + Duration::seconds(EXPIRY_GRACE_SECS) < Utc::now()
    }

    /// Returns `true` if the token will expire within `buffer`.
    pub fn expires_within(&self, buffer: Duration) -> bool {
        Utc::now() + buffer >= self.expiry
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("value", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// The token currently used by a client.
///
/// `Session` is cheap to clone and shared by every task using the client.
/// Obtaining and renewing tokens is up to the caller: hand a fresh token to
/// [`Session::replace`] before the current one expires.
#[derive(Clone)]
pub struct Session {
    inner: Arc<RwLock<Token>>,
}

impl Session {
    /// Create a session holding `token`.
    pub fn new(token: Token) -> Self {
        Self {
            inner: Arc::new(RwLock::new(token)),
        }
    }

    /// Swap in a new token.
    pub async fn replace(&self, token: Token) {
        *self.inner.write().await = token;
    }

    /// Check if the current token has expired.
    pub async fn is_expired(&self) -> bool {
        self.inner.read().await.is_expired()
    }

    /// Check if the current token will expire within the given buffer.
    pub async fn expires_within(&self, buffer: Duration) -> bool {
        self.inner.read().await.expires_within(buffer)
    }

    /// Expiry of the current token.
    pub async fn expires_at(&self) -> DateTime<Utc> {
        self.inner.read().await.expiry()
    }

    /// The token value to send with a request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionExpired`] when the current token has expired.
    pub(crate) async fn token_value(&self) -> Result<String> {
        let token = self.inner.read().await;
        if token.is_expired() {
            return Err(Error::SessionExpired);
        }
        Ok(token.value.expose_secret().to_string())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .finish()
    }
}
