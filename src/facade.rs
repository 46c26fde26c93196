//! Communication System Facade
//!
//! Single entry point the rest of the router uses to ask about peer
//! connectivity, capacity and overall reachability. Peer and session
//! state is owned by the transports; the facade only aggregates, and
//! answers with conservative defaults whenever no transport can
//! answer, so callers keep working during startup before any
//! transport is registered.

use crate::config::CommConfig;
use crate::geo::{CountryCode, GeoLocator, NoGeoLocator};
use crate::identity::PeerId;
use crate::registry::TransportRegistry;
use crate::skew;
use crate::status::{classify, ReachabilityStatus};
use crate::transport::{AddressFamily, TransportAddr};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Headroom threshold for "high" outbound capacity, in percent.
const HIGH_OUTBOUND_CAPACITY_PCT: u8 = 80;

/// Current time as Unix milliseconds.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ============================================================================
// Query Surface
// ============================================================================

/// Query surface the router core depends on.
///
/// Every method is bounded and non-blocking, and answers a
/// conservative default when the underlying fact is unavailable.
pub trait CommSystem: Send + Sync {
    /// Peers with any traffic within the active window, de-duplicated
    /// by identity across transports.
    fn count_active_peers(&self) -> usize;

    /// Whether inbound bandwidth headroom is at least `pct` percent of
    /// the configured limit.
    fn have_inbound_capacity(&self, pct: u8) -> bool;

    /// Whether outbound bandwidth headroom is at least `pct` percent
    /// of the configured limit.
    fn have_outbound_capacity(&self, pct: u8) -> bool;

    /// Whether outbound headroom is comfortably high.
    fn have_high_outbound_capacity(&self) -> bool {
        self.have_outbound_capacity(HIGH_OUTBOUND_CAPACITY_PCT)
    }

    /// Whether any transport holds an established session with `peer`.
    fn is_established(&self, peer: &PeerId) -> bool;

    /// Whether the session with `peer` is backlogged.
    fn is_backlogged(&self, peer: &PeerId) -> bool;

    /// Whether the last attempt to reach `peer` failed.
    fn was_unreachable(&self, peer: &PeerId) -> bool;

    /// Current overall reachability (cached between family-state
    /// changes).
    fn reachability_status(&self) -> ReachabilityStatus;

    /// Median clock skew of connected peers in seconds, if any peer
    /// reported one.
    fn median_peer_clock_skew(&self) -> Option<i64>;

    /// Framed average clock skew in seconds: the extreme tails are
    /// trimmed symmetrically before averaging over roughly
    /// `pct_to_include` percent of the samples.
    fn framed_average_peer_clock_skew(&self, pct_to_include: u8) -> i64;

    /// Country the peer maps to, if the geolocation source knows it.
    fn country(&self, peer: &PeerId) -> Option<CountryCode>;

    /// Whether the peer maps to a blocklisted country.
    fn is_in_bad_country(&self, peer: &PeerId) -> bool;

    /// Addresses the transports currently advertise.
    fn local_addresses(&self) -> Vec<TransportAddr>;
}

/// Placeholder comm system for routers with networking disabled.
///
/// Answers every query with the conservative default.
#[derive(Debug, Default)]
pub struct DummyCommSystem;

impl CommSystem for DummyCommSystem {
    fn count_active_peers(&self) -> usize {
        0
    }

    fn have_inbound_capacity(&self, _pct: u8) -> bool {
        true
    }

    fn have_outbound_capacity(&self, _pct: u8) -> bool {
        true
    }

    fn is_established(&self, _peer: &PeerId) -> bool {
        false
    }

    fn is_backlogged(&self, _peer: &PeerId) -> bool {
        false
    }

    fn was_unreachable(&self, _peer: &PeerId) -> bool {
        false
    }

    fn reachability_status(&self) -> ReachabilityStatus {
        ReachabilityStatus::Unknown
    }

    fn median_peer_clock_skew(&self) -> Option<i64> {
        None
    }

    fn framed_average_peer_clock_skew(&self, _pct_to_include: u8) -> i64 {
        0
    }

    fn country(&self, _peer: &PeerId) -> Option<CountryCode> {
        None
    }

    fn is_in_bad_country(&self, _peer: &PeerId) -> bool {
        false
    }

    fn local_addresses(&self) -> Vec<TransportAddr> {
        Vec::new()
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Point-in-time view of the comm subsystem, handed to external
/// renderers. This core only supplies the data, never the markup.
#[derive(Clone, Debug)]
pub struct CommSnapshot {
    /// Overall reachability at snapshot time.
    pub status: ReachabilityStatus,
    /// Number of registered transports.
    pub transport_count: usize,
    /// Active peers, de-duplicated and sorted for stable output.
    pub active_peers: Vec<PeerId>,
    /// Advertised local addresses.
    pub local_addresses: Vec<TransportAddr>,
}

// ============================================================================
// Manager
// ============================================================================

/// Concrete comm system over a transport registry.
///
/// Stateless apart from the cached reachability status; everything
/// else is recomputed per query from transport-owned facts.
pub struct CommManager {
    registry: Arc<TransportRegistry>,
    geo: Arc<dyn GeoLocator>,
    config: CommConfig,
    status: RwLock<ReachabilityStatus>,
}

impl CommManager {
    /// Create a manager over the given registry with no geolocation
    /// source.
    pub fn new(registry: Arc<TransportRegistry>, config: CommConfig) -> Self {
        Self::with_geo(registry, config, Arc::new(NoGeoLocator))
    }

    /// Create a manager with an explicit geolocation collaborator.
    pub fn with_geo(
        registry: Arc<TransportRegistry>,
        config: CommConfig,
        geo: Arc<dyn GeoLocator>,
    ) -> Self {
        let initial = config.reachability.initial_status();
        Self {
            registry,
            geo,
            config,
            status: RwLock::new(initial),
        }
    }

    /// The registry this manager aggregates over.
    pub fn registry(&self) -> &Arc<TransportRegistry> {
        &self.registry
    }

    /// Recompute the overall reachability from every transport's
    /// current per-family states and cache the result.
    ///
    /// Call whenever a transport reports a family-state change. Each
    /// transport's family pair is classified on its own; the overall
    /// answer is the worst of those classifications, or the configured
    /// initial status while no transport is registered. The cache
    /// update is atomic with respect to concurrent reads.
    pub fn refresh_reachability(&self) -> ReachabilityStatus {
        let transports = self.registry.list_active();
        let status = transports
            .iter()
            .map(|t| {
                classify(
                    t.family_state(AddressFamily::V4),
                    t.family_state(AddressFamily::V6),
                )
            })
            .fold(None, |worst: Option<ReachabilityStatus>, s| {
                Some(match worst {
                    Some(w) => ReachabilityStatus::worse_of(w, s),
                    None => s,
                })
            })
            .unwrap_or_else(|| self.config.reachability.initial_status());

        let mut cached = self.status.write();
        let old = *cached;
        if old != status {
            info!(%old, new = %status, "reachability changed");
            *cached = status;
        }
        status
    }

    /// Produce a snapshot for an external status renderer.
    pub fn snapshot(&self) -> CommSnapshot {
        let mut active_peers = self.active_peers_at(now_ms());
        active_peers.sort_unstable();
        CommSnapshot {
            status: self.reachability_status(),
            transport_count: self.registry.len(),
            active_peers,
            local_addresses: self.local_addresses(),
        }
    }

    /// Active peers within the configured window, de-duplicated.
    fn active_peers_at(&self, now_ms: u64) -> Vec<PeerId> {
        let window_ms = self.config.peers.active_window_ms();
        let mut seen: HashSet<PeerId> = HashSet::new();
        for transport in self.registry.list_active() {
            for facts in transport.session_facts() {
                if facts.active_within(now_ms, window_ms) {
                    seen.insert(facts.peer);
                }
            }
        }
        seen.into_iter().collect()
    }

    fn count_active_peers_at(&self, now_ms: u64) -> usize {
        self.active_peers_at(now_ms).len()
    }

    /// Skew samples from all established sessions that reported one.
    fn skew_samples(&self) -> Vec<i64> {
        let mut samples = Vec::new();
        for transport in self.registry.list_active() {
            for facts in transport.session_facts() {
                if facts.established {
                    if let Some(skew) = facts.clock_skew_secs {
                        samples.push(skew);
                    }
                }
            }
        }
        samples
    }

    /// Headroom check shared by both directions.
    ///
    /// An unconfigured (zero) limit means unlimited, which always has
    /// headroom; likewise a router with no transports yet.
    fn have_capacity(limit_bps: Option<u64>, used_bps: u64, pct: u8) -> bool {
        let Some(limit) = limit_bps else {
            return true;
        };
        let available = limit.saturating_sub(used_bps);
        available as u128 * 100 >= limit as u128 * pct as u128
    }

    fn inbound_used_bps(&self) -> u64 {
        self.registry
            .list_active()
            .iter()
            .map(|t| t.bandwidth_usage().inbound_bps)
            .sum()
    }

    fn outbound_used_bps(&self) -> u64 {
        self.registry
            .list_active()
            .iter()
            .map(|t| t.bandwidth_usage().outbound_bps)
            .sum()
    }
}

impl CommSystem for CommManager {
    fn count_active_peers(&self) -> usize {
        self.count_active_peers_at(now_ms())
    }

    fn have_inbound_capacity(&self, pct: u8) -> bool {
        Self::have_capacity(
            self.config.bandwidth.inbound_limit_bps(),
            self.inbound_used_bps(),
            pct,
        )
    }

    fn have_outbound_capacity(&self, pct: u8) -> bool {
        Self::have_capacity(
            self.config.bandwidth.outbound_limit_bps(),
            self.outbound_used_bps(),
            pct,
        )
    }

    fn is_established(&self, peer: &PeerId) -> bool {
        self.registry
            .list_active()
            .iter()
            .any(|t| t.is_established(peer))
    }

    fn is_backlogged(&self, peer: &PeerId) -> bool {
        self.registry
            .list_active()
            .iter()
            .any(|t| t.is_backlogged(peer))
    }

    fn was_unreachable(&self, peer: &PeerId) -> bool {
        self.registry
            .list_active()
            .iter()
            .any(|t| t.was_unreachable(peer))
    }

    fn reachability_status(&self) -> ReachabilityStatus {
        *self.status.read()
    }

    fn median_peer_clock_skew(&self) -> Option<i64> {
        skew::median(&self.skew_samples())
    }

    fn framed_average_peer_clock_skew(&self, pct_to_include: u8) -> i64 {
        skew::framed_average(&self.skew_samples(), pct_to_include)
    }

    fn country(&self, peer: &PeerId) -> Option<CountryCode> {
        self.geo.country_of(peer)
    }

    fn is_in_bad_country(&self, peer: &PeerId) -> bool {
        match self.geo.country_of(peer) {
            Some(code) => self.geo.is_bad_country(&code),
            None => false,
        }
    }

    fn local_addresses(&self) -> Vec<TransportAddr> {
        let mut addrs: Vec<TransportAddr> = self
            .registry
            .list_active()
            .iter()
            .filter_map(|t| t.local_address())
            .collect();
        // Registry snapshots carry no ordering, so equal addresses
        // from different transports need not be adjacent.
        addrs.sort_unstable();
        addrs.dedup();
        debug!(count = addrs.len(), "collected local addresses");
        addrs
    }
}

// ============================================================================
// Tests
// ============================================================================
