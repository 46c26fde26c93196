//! Transport Contract
//!
//! The capability interface pluggable transports present to the rest
//! of the router. Concrete transports (UDP-like, TCP-like, onion, ...)
//! live outside this core; the registry and facade consume them only
//! through the [`Transport`] trait and the small value types here.

use crate::identity::PeerId;
use crate::status::FamilyState;
use std::fmt;

// ============================================================================
// Transport Identifiers
// ============================================================================

/// Unique identifier for a transport instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransportId(u32);

impl TransportId {
    /// Create a new transport ID.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TransportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport:{}", self.0)
    }
}

// ============================================================================
// Address Family
// ============================================================================

/// IP address family, classified independently for reachability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AddressFamily::V4 => "ipv4",
            AddressFamily::V6 => "ipv6",
        };
        write!(f, "{}", s)
    }
}

// ============================================================================
// Transport Address
// ============================================================================

/// Opaque transport-specific address.
///
/// Each transport interprets this differently:
/// - UDP-like: "ip:port"
/// - TCP-like: "ip:port"
/// - Onion: ".onion:port"
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransportAddr(Vec<u8>);

impl TransportAddr {
    /// Create a transport address from raw bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Create a transport address from a string.
    pub fn from_string(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Try to interpret as a UTF-8 string.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Get the length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for TransportAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "TransportAddr(\"{}\")", s),
            None => write!(f, "TransportAddr({:?})", self.0),
        }
    }
}

impl fmt::Display for TransportAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Best-effort display as string if valid UTF-8, else hex
        match self.as_str() {
            Some(s) => write!(f, "{}", s),
            None => {
                for byte in &self.0 {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for TransportAddr {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

impl From<String> for TransportAddr {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

// ============================================================================
// Per-Peer Facts
// ============================================================================

/// Derived per-peer, per-transport facts, recomputed on demand.
///
/// Transports are the source of truth; this core never stores these.
#[derive(Clone, Debug)]
pub struct PeerFacts {
    /// Which peer these facts describe.
    pub peer: PeerId,
    /// Whether a session is currently established.
    pub established: bool,
    /// Whether the outbound queue for this peer is saturated.
    pub backlogged: bool,
    /// When any message was last received from this peer (Unix ms).
    pub last_received_ms: u64,
    /// When a message was last sent to this peer (Unix ms).
    pub last_sent_ms: u64,
    /// Peer-reported clock skew in seconds, if known.
    pub clock_skew_secs: Option<i64>,
}

impl PeerFacts {
    /// Facts for a freshly established session with no traffic yet.
    pub fn established(peer: PeerId) -> Self {
        Self {
            peer,
            established: true,
            backlogged: false,
            last_received_ms: 0,
            last_sent_ms: 0,
            clock_skew_secs: None,
        }
    }

    /// Most recent activity in either direction (Unix ms).
    pub fn last_activity_ms(&self) -> u64 {
        self.last_received_ms.max(self.last_sent_ms)
    }

    /// Whether this peer had traffic within `window_ms` before `now_ms`.
    pub fn active_within(&self, now_ms: u64, window_ms: u64) -> bool {
        let last = self.last_activity_ms();
        last != 0 && now_ms.saturating_sub(last) <= window_ms
    }
}

// ============================================================================
// Bandwidth Usage
// ============================================================================

/// Current bandwidth usage as reported by a transport.
#[derive(Clone, Copy, Debug, Default)]
pub struct BandwidthUsage {
    /// Inbound usage in bytes per second.
    pub inbound_bps: u64,
    /// Outbound usage in bytes per second.
    pub outbound_bps: u64,
}

impl BandwidthUsage {
    /// Create a usage sample.
    pub fn new(inbound_bps: u64, outbound_bps: u64) -> Self {
        Self {
            inbound_bps,
            outbound_bps,
        }
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Capability contract presented by a pluggable transport.
///
/// Implementations own all session and probing state; every method is
/// a bounded, non-blocking query over state the transport already
/// holds. Slow lookups do not belong behind this trait.
pub trait Transport: Send + Sync {
    /// Get the transport identifier.
    fn transport_id(&self) -> TransportId;

    /// Short style name ("udp", "tcp", ...), for logs and snapshots.
    fn style(&self) -> &'static str;

    /// Whether this transport can accept unsolicited inbound connections.
    fn can_receive_unsolicited(&self) -> bool;

    /// Whether this transport is enabled for the given family.
    fn supports_family(&self, family: AddressFamily) -> bool;

    /// Latest detected reachability for the given family.
    fn family_state(&self, family: AddressFamily) -> FamilyState;

    /// Whether a session with `peer` is currently established.
    fn is_established(&self, peer: &PeerId) -> bool;

    /// Whether the outbound queue for `peer` is saturated.
    fn is_backlogged(&self, peer: &PeerId) -> bool;

    /// Whether the last connection attempt to `peer` failed.
    fn was_unreachable(&self, peer: &PeerId) -> bool;

    /// Snapshot of per-peer facts for all current sessions.
    fn session_facts(&self) -> Vec<PeerFacts>;

    /// Current bandwidth usage.
    fn bandwidth_usage(&self) -> BandwidthUsage {
        BandwidthUsage::default()
    }

    /// Externally reachable address this transport advertises, if any.
    fn local_address(&self) -> Option<TransportAddr> {
        None
    }

    /// Notification that the local reachable address changed.
    ///
    /// Transports re-advertise as they see fit; the default ignores it.
    fn address_changed(&self, _new_addr: &TransportAddr) {}
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_id() {
        let id = TransportId::new(42);
        assert_eq!(id.as_u32(), 42);
        assert_eq!(format!("{}", id), "transport:42");
    }

    #[test]
    fn test_address_family_display() {
        assert_eq!(format!("{}", AddressFamily::V4), "ipv4");
        assert_eq!(format!("{}", AddressFamily::V6), "ipv6");
    }

    #[test]
    fn test_transport_addr_string() {
        let addr = TransportAddr::from_string("192.168.1.1:4000");
        assert_eq!(format!("{}", addr), "192.168.1.1:4000");
        assert_eq!(addr.as_str(), Some("192.168.1.1:4000"));
    }

    #[test]
    fn test_transport_addr_binary() {
        // Binary address with invalid UTF-8 bytes
        let binary = TransportAddr::new(vec![0xff, 0x80, 0x2b, 0x3c]);
        assert_eq!(format!("{}", binary), "ff802b3c");
        assert!(binary.as_str().is_none());
        assert_eq!(binary.len(), 4);
    }

    #[test]
    fn test_transport_addr_from() {
        let addr: TransportAddr = "host:1234".into();
        assert_eq!(addr.as_str(), Some("host:1234"));

        let addr2: TransportAddr = String::from("hello").into();
        assert_eq!(addr2.as_str(), Some("hello"));
    }

    #[test]
    fn test_capability_surface() {
        use crate::status::FamilyState;
        use crate::testutil::MockTransport;

        let transport = MockTransport::new(1, "udp");
        assert!(transport.can_receive_unsolicited());
        assert!(transport.supports_family(AddressFamily::V4));
        assert!(transport.supports_family(AddressFamily::V6));

        transport.set_family_states(FamilyState::Ok, FamilyState::Disabled);
        assert!(transport.supports_family(AddressFamily::V4));
        assert!(!transport.supports_family(AddressFamily::V6));
    }

    #[test]
    fn test_peer_facts_activity() {
        let peer = PeerId::from_bytes([1u8; 32]);
        let mut facts = PeerFacts::established(peer);
        assert_eq!(facts.last_activity_ms(), 0);
        // No traffic yet counts as inactive regardless of window.
        assert!(!facts.active_within(10_000, u64::MAX));

        facts.last_received_ms = 4_000;
        facts.last_sent_ms = 6_000;
        assert_eq!(facts.last_activity_ms(), 6_000);
        assert!(facts.active_within(10_000, 5_000));
        assert!(!facts.active_within(12_000, 5_000));
    }

    #[test]
    fn test_bandwidth_usage_default() {
        let usage = BandwidthUsage::default();
        assert_eq!(usage.inbound_bps, 0);
        assert_eq!(usage.outbound_bps, 0);
    }
}
