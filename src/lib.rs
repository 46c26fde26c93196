//! commsys: Router Communication Subsystem
//!
//! Core of a peer-to-peer router's comm layer: combines per-family
//! reachability observations into one ordered overall status, keeps
//! the registry of pluggable transports, and presents the query facade
//! the rest of the router uses for peer connectivity, capacity and
//! health.

pub mod config;
pub mod facade;
pub mod geo;
pub mod identity;
pub mod registry;
pub mod skew;
pub mod status;
pub mod transport;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export identity types
pub use identity::{IdentityError, PeerId};

// Re-export config types
pub use config::{BandwidthConfig, CommConfig, ConfigError, PeerConfig, ReachabilityConfig};

// Re-export classification types
pub use status::{classify, FamilyState, ReachabilityStatus, ALL_STATUSES};

// Re-export transport types
pub use transport::{
    AddressFamily, BandwidthUsage, PeerFacts, Transport, TransportAddr, TransportId,
};

// Re-export registry and facade types
pub use facade::{CommManager, CommSnapshot, CommSystem, DummyCommSystem};
pub use geo::{CountryCode, GeoLocator, NoGeoLocator};
pub use registry::TransportRegistry;
