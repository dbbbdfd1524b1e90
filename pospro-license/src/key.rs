//! License key normalization and hashing.
//!
//! A key is never stored verbatim. It is normalized (trimmed, upper-cased)
//! and reduced to a [`KeyHash`], a signed 32-bit value computed as
//!
//! ```text
//! h = 0
//! for each UTF-16 code unit u:  h = wrap_i32(h * 31 + u)
//! ```
//!
//! The wrap is applied at every step, not once at the end: the hashes on the
//! allow-list were produced that way and intermediate overflow changes the
//! result.

use crate::error::{LicenseError, LicenseResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// The trial key. Always accepted at activation, without an allow-list lookup.
pub const DEMO_KEY: &str = "DEMO-1HOUR-ACCESS";

/// Trims surrounding whitespace and upper-cases the key.
///
/// A byte-order mark (U+FEFF) counts as whitespace, so keys pasted from
/// BOM-prefixed text still match. Performs no length or charset validation.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .to_uppercase()
}

/// The 32-bit hash of a normalized license key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyHash(i32);

impl KeyHash {
    /// Hashes an already-normalized key.
    #[must_use]
    pub fn of(normalized: &str) -> Self {
        let hash = normalized
            .encode_utf16()
            .fold(0i32, |acc, unit| acc.wrapping_mul(31).wrapping_add(i32::from(unit)));
        Self(hash)
    }

    /// Wraps a stored hash value.
    #[must_use]
    pub const fn from_raw(value: i32) -> Self {
        Self(value)
    }

    /// Returns the signed 32-bit value.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for KeyHash {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl From<KeyHash> for i32 {
    fn from(hash: KeyHash) -> Self {
        hash.0
    }
}

/// A license key as entered by a user, normalized and hashed.
///
/// Exists only for the duration of one activation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseKey {
    normalized: String,
    hash: KeyHash,
}

impl LicenseKey {
    /// Normalizes and hashes a raw key.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::EmptyKey`] if nothing is left after trimming.
    pub fn parse(raw: &str) -> LicenseResult<Self> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return Err(LicenseError::EmptyKey);
        }
        let hash = KeyHash::of(&normalized);
        Ok(Self { normalized, hash })
    }

    /// Returns the normalized key text.
    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Returns the key's hash.
    #[must_use]
    pub fn hash(&self) -> KeyHash {
        self.hash
    }

    /// Returns true if this is the trial key.
    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.normalized == DEMO_KEY
    }
}
