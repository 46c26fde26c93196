//! Test Helpers
//!
//! Scriptable transport double used by registry and facade tests.

use crate::identity::PeerId;
use crate::status::FamilyState;
use crate::transport::{
    AddressFamily, BandwidthUsage, PeerFacts, Transport, TransportAddr, TransportId,
};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Make a distinct peer ID from a single byte.
pub fn peer(val: u8) -> PeerId {
    let mut bytes = [0u8; 32];
    bytes[0] = val;
    PeerId::from_bytes(bytes)
}

/// Transport double whose every answer is scripted by the test.
pub struct MockTransport {
    id: TransportId,
    style: &'static str,
    can_unsolicited: bool,
    v4_state: RwLock<FamilyState>,
    v6_state: RwLock<FamilyState>,
    facts: RwLock<Vec<PeerFacts>>,
    unreachable: RwLock<HashSet<PeerId>>,
    usage: RwLock<BandwidthUsage>,
    local_addr: RwLock<Option<TransportAddr>>,
    address_changes: AtomicUsize,
}

impl MockTransport {
    /// New mock defaulting to both families in Testing.
    pub fn new(id: u32, style: &'static str) -> Self {
        Self {
            id: TransportId::new(id),
            style,
            can_unsolicited: true,
            v4_state: RwLock::new(FamilyState::Testing),
            v6_state: RwLock::new(FamilyState::Testing),
            facts: RwLock::new(Vec::new()),
            unreachable: RwLock::new(HashSet::new()),
            usage: RwLock::new(BandwidthUsage::default()),
            local_addr: RwLock::new(None),
            address_changes: AtomicUsize::new(0),
        }
    }

    /// Script the per-family reachability states.
    pub fn set_family_states(&self, v4: FamilyState, v6: FamilyState) {
        *self.v4_state.write() = v4;
        *self.v6_state.write() = v6;
    }

    /// Script the per-peer session facts.
    pub fn set_facts(&self, facts: Vec<PeerFacts>) {
        *self.facts.write() = facts;
    }

    /// Add one peer's session facts.
    pub fn add_peer(&self, facts: PeerFacts) {
        self.facts.write().push(facts);
    }

    /// Mark a peer as having failed its last connection attempt.
    pub fn mark_unreachable(&self, peer: PeerId) {
        self.unreachable.write().insert(peer);
    }

    /// Script the current bandwidth usage.
    pub fn set_usage(&self, usage: BandwidthUsage) {
        *self.usage.write() = usage;
    }

    /// Script the advertised local address.
    pub fn set_local_address(&self, addr: TransportAddr) {
        *self.local_addr.write() = Some(addr);
    }

    /// How many address-change notifications this mock received.
    pub fn address_changes(&self) -> usize {
        self.address_changes.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn transport_id(&self) -> TransportId {
        self.id
    }

    fn style(&self) -> &'static str {
        self.style
    }

    fn can_receive_unsolicited(&self) -> bool {
        self.can_unsolicited
    }

    fn supports_family(&self, family: AddressFamily) -> bool {
        self.family_state(family) != FamilyState::Disabled
    }

    fn family_state(&self, family: AddressFamily) -> FamilyState {
        match family {
            AddressFamily::V4 => *self.v4_state.read(),
            AddressFamily::V6 => *self.v6_state.read(),
        }
    }

    fn is_established(&self, peer: &PeerId) -> bool {
        self.facts
            .read()
            .iter()
            .any(|f| f.peer == *peer && f.established)
    }

    fn is_backlogged(&self, peer: &PeerId) -> bool {
        self.facts
            .read()
            .iter()
            .any(|f| f.peer == *peer && f.backlogged)
    }

    fn was_unreachable(&self, peer: &PeerId) -> bool {
        self.unreachable.read().contains(peer)
    }

    fn session_facts(&self) -> Vec<PeerFacts> {
        self.facts.read().clone()
    }

    fn bandwidth_usage(&self) -> BandwidthUsage {
        *self.usage.read()
    }

    fn local_address(&self) -> Option<TransportAddr> {
        self.local_addr.read().clone()
    }

    fn address_changed(&self, _new_addr: &TransportAddr) {
        self.address_changes.fetch_add(1, Ordering::SeqCst);
    }
}
