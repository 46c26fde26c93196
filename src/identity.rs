//! Peer Identity
//!
//! Opaque 32-byte router identity hash used to name remote peers.
//! This core never derives or verifies identities; it only needs a
//! stable, hashable key for de-duplication and per-peer queries.
//! Transports are the source of truth for which peers exist.

use std::fmt;
use thiserror::Error;

/// Errors related to peer identity handling.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid peer id length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// 32-byte peer identity hash.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeerId([u8; 32]);

impl PeerId {
    /// Create a PeerId from a 32-byte array.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a PeerId from a slice.
    pub fn from_slice(slice: &[u8]) -> Result<Self, IdentityError> {
        if slice.len() != 32 {
            return Err(IdentityError::InvalidLength(slice.len()));
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Return the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Return the bytes as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

/// Encode bytes as lowercase hex.
pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", hex_encode(&self.0[..8]))
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex_encode(&self.0))
    }
}

impl AsRef<[u8]> for PeerId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_id_from_bytes() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xab;
        let id = PeerId::from_bytes(bytes);
        assert_eq!(id.as_bytes()[0], 0xab);
        assert!(format!("{}", id).starts_with("ab00"));
    }

    #[test]
    fn test_peer_id_from_slice() {
        let bytes = [7u8; 32];
        let id = PeerId::from_slice(&bytes).unwrap();
        assert_eq!(id.as_slice(), &bytes[..]);

        assert!(matches!(
            PeerId::from_slice(&[0u8; 16]),
            Err(IdentityError::InvalidLength(16))
        ));
    }

    #[test]
    fn test_peer_id_ordering_and_hash() {
        use std::collections::HashSet;

        let a = PeerId::from_bytes([1u8; 32]);
        let b = PeerId::from_bytes([2u8; 32]);
        assert!(a < b);

        let mut set = HashSet::new();
        set.insert(a);
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_peer_id_debug_is_truncated() {
        let id = PeerId::from_bytes([0xffu8; 32]);
        let dbg = format!("{:?}", id);
        assert_eq!(dbg, format!("PeerId({})", "ff".repeat(8)));
    }
}
