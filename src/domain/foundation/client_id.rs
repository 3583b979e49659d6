//! Client identity derived from request metadata.

use std::fmt;

/// Shared identity for every caller that arrives without a forwarding header.
pub const UNKNOWN_CLIENT: &str = "unknown_ip";

/// Opaque key a caller's quota is tracked under.
///
/// Derived from the forwarding-address header. Callers without the header
/// all collapse into the [`UNKNOWN_CLIENT`] bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a client id, falling back to the sentinel for blank input.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self::unknown()
        } else {
            Self(trimmed.to_string())
        }
    }

    /// The sentinel identity.
    pub fn unknown() -> Self {
        Self(UNKNOWN_CLIENT.to_string())
    }

    /// Builds the id from a raw `X-Forwarded-For` value.
    ///
    /// Only the left-most address (the originating client) is kept.
    pub fn from_forwarded_for(header: Option<&str>) -> Self {
        match header.and_then(|h| h.split(',').next()) {
            Some(first) => Self::new(first),
            None => Self::unknown(),
        }
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the shared sentinel bucket.
    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_CLIENT
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
