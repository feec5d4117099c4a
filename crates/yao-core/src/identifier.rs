//! Identifier grammar accepted by resource lookups.
//!
//! A lookup identifier is an absolute URL, a canonical UUID, or anything
//! else, which is treated as a name.

use std::fmt;
use uuid::Uuid;

/// Classification of a lookup identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifier<'a> {
    /// Absolute `http://` or `https://` URL, requested verbatim
    Url(&'a str),
    /// Canonical lowercase `8-4-4-4-12` UUID
    Uuid(&'a str),
    /// Anything else, resolved by name
    Name(&'a str),
}

impl<'a> Identifier<'a> {
    /// Classify a raw identifier.
    #[must_use]
    pub fn classify(raw: &'a str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw)
        } else if is_uuid(raw) {
            Self::Uuid(raw)
        } else {
            Self::Name(raw)
        }
    }

    /// The raw identifier string.
    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        match self {
            Self::Url(s) | Self::Uuid(s) | Self::Name(s) => s,
        }
    }
}

impl fmt::Display for Identifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true when `s` is a canonical hyphenated UUID in lowercase hex.
///
/// Braced, URN, simple and uppercase forms are not canonical and return
/// false.
#[must_use]
pub fn is_uuid(s: &str) -> bool {
    s.len() == 36
        && !s.bytes().any(|b| b.is_ascii_uppercase())
        && Uuid::try_parse(s).is_ok()
}
