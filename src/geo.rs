//! Geolocation Collaborator
//!
//! Seam for the external GeoIP/blocklist source the facade delegates
//! country questions to. Lookups behind this trait must already be
//! cached or otherwise cheap; the facade calls them inline.

use crate::identity::PeerId;
use std::fmt;

/// Two-letter country code, lowercase-normalized.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// Create a country code from two ASCII letters.
    ///
    /// Returns None for anything that is not exactly two ASCII letters.
    pub fn new(code: &str) -> Option<Self> {
        let bytes = code.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(|b| b.is_ascii_alphabetic()) {
            return None;
        }
        Some(Self([
            bytes[0].to_ascii_lowercase(),
            bytes[1].to_ascii_lowercase(),
        ]))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        // Always two ASCII letters by construction.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl fmt::Debug for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CountryCode({})", self.as_str())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// External source of peer geolocation and country blocklist answers.
pub trait GeoLocator: Send + Sync {
    /// Country the peer's address maps to, if known.
    fn country_of(&self, peer: &PeerId) -> Option<CountryCode>;

    /// Whether a country is on the operator's blocklist.
    fn is_bad_country(&self, code: &CountryCode) -> bool;
}

/// Geolocator used before any real source is wired up.
///
/// Answers conservatively: no country known, nothing blocklisted.
#[derive(Debug, Default)]
pub struct NoGeoLocator;

impl GeoLocator for NoGeoLocator {
    fn country_of(&self, _peer: &PeerId) -> Option<CountryCode> {
        None
    }

    fn is_bad_country(&self, _code: &CountryCode) -> bool {
        false
    }
}

// ============================================================================
// Tests
// ============================================================================
