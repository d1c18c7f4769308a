use std::fmt;

use http::HeaderValue;
use http::header::{AUTHORIZATION, HeaderName};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::ChirpyError;

/// Placeholder shown instead of a secret.
pub(crate) const REDACTED: &str = "[REDACTED]";

/// Secret string (password, access token) that zeroes its memory on drop.
///
/// `Debug` never shows the value and `Display` only shows a masked form, so a
/// secret can be logged or end up in an assertion message without leaking.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Wraps a secret value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns the secret value.
    ///
    /// Keep the returned reference short-lived.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Checks the secret against a plain value without exposing it.
    pub fn equals_str(&self, other: &str) -> bool {
        self.0 == other
    }

    pub(crate) fn mask(value: &str) -> String {
        let chars = value.chars().collect::<Vec<_>>();
        if chars.len() <= 8 {
            return "***".to_owned();
        }
        let head = chars.iter().take(4).collect::<String>();
        let tail = chars.iter().skip(chars.len() - 4).collect::<String>();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecureString").field(&REDACTED).finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::mask(&self.0))
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_owned())
    }
}

impl Serialize for SecureString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Authentication attached to every call made by a client.
#[derive(Clone, PartialEq, Eq)]
pub enum Authentication {
    /// `Authorization: Bearer <token>` (RFC 6750).
    Bearer(SecureString),
}

impl Authentication {
    /// Builds the header carrying this authentication.
    ///
    /// # Errors
    ///
    /// Fails if the token contains characters not allowed in a header value.
    pub fn to_header(&self) -> Result<(HeaderName, HeaderValue), ChirpyError> {
        match self {
            Self::Bearer(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))?;
                value.set_sensitive(true);
                Ok((AUTHORIZATION, value))
            }
        }
    }
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&REDACTED).finish(),
        }
    }
}

impl fmt::Display for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(token) => write!(f, "Bearer {token}"),
        }
    }
}
