//! Transport Registry
//!
//! Holds the set of currently active pluggable transports, keyed by
//! transport ID. Registration is idempotent, snapshots are point-in-
//! time, and address-change notifications fan out to each registered
//! transport exactly once per call.

use crate::transport::{Transport, TransportAddr, TransportId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry of active transports.
///
/// Shared, long-lived object. Each individual operation is atomic with
/// respect to the others; snapshots may be stale the moment they are
/// returned.
#[derive(Default)]
pub struct TransportRegistry {
    transports: RwLock<HashMap<TransportId, Arc<dyn Transport>>>,
}

impl TransportRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transport.
    ///
    /// Idempotent: registering an already-registered transport ID is a
    /// no-op, the original registration stays.
    pub fn register(&self, transport: Arc<dyn Transport>) {
        let id = transport.transport_id();
        let mut map = self.transports.write();
        if map.contains_key(&id) {
            debug!(%id, "transport already registered");
            return;
        }
        debug!(%id, style = transport.style(), "registered transport");
        map.insert(id, transport);
    }

    /// Unregister a transport. Unknown IDs are a no-op.
    pub fn unregister(&self, id: TransportId) {
        if self.transports.write().remove(&id).is_some() {
            debug!(%id, "unregistered transport");
        }
    }

    /// Whether a transport with this ID is currently registered.
    pub fn is_registered(&self, id: TransportId) -> bool {
        self.transports.read().contains_key(&id)
    }

    /// Number of currently registered transports.
    pub fn len(&self) -> usize {
        self.transports.read().len()
    }

    /// Whether no transports are registered.
    pub fn is_empty(&self) -> bool {
        self.transports.read().is_empty()
    }

    /// Point-in-time snapshot of the registered transports.
    ///
    /// Never a live view: register/unregister calls made after this
    /// returns do not affect the snapshot.
    pub fn list_active(&self) -> Vec<Arc<dyn Transport>> {
        self.transports.read().values().cloned().collect()
    }

    /// Tell every registered transport that our reachable address
    /// changed, so each may re-advertise.
    ///
    /// The transport set is snapshotted first and the lock released
    /// before any transport is called; each transport in the snapshot
    /// is notified exactly once, in unspecified order.
    pub fn notify_address_changed(&self, new_addr: &TransportAddr) {
        let snapshot = self.list_active();
        debug!(addr = %new_addr, count = snapshot.len(), "notifying address change");
        for transport in snapshot {
            transport.address_changed(new_addr);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
