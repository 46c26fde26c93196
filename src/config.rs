//! Communication Subsystem Configuration
//!
//! Loads comm settings from a YAML file. All fields are optional with
//! conservative defaults, so a router with no config file still comes
//! up with a working (if optimistic) comm core.
//!
//! # YAML Structure
//!
//! ```yaml
//! bandwidth:
//!   inbound_kbps: 512
//!   outbound_kbps: 256
//! peers:
//!   active_window_secs: 300
//! reachability:
//!   initial: unknown
//! ```

use crate::status::ReachabilityStatus;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default active-peer accounting window (5 minutes).
const DEFAULT_ACTIVE_WINDOW_SECS: u64 = 300;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Bandwidth limit configuration (`bandwidth.*`).
///
/// Zero means unlimited; capacity queries answer optimistically for
/// an unlimited direction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BandwidthConfig {
    /// Inbound limit in KB/s (`inbound_kbps`). 0 = unlimited.
    #[serde(default)]
    pub inbound_kbps: u64,

    /// Outbound limit in KB/s (`outbound_kbps`). 0 = unlimited.
    #[serde(default)]
    pub outbound_kbps: u64,
}

impl BandwidthConfig {
    /// Inbound limit in bytes per second, if limited.
    pub fn inbound_limit_bps(&self) -> Option<u64> {
        (self.inbound_kbps > 0).then(|| self.inbound_kbps * 1024)
    }

    /// Outbound limit in bytes per second, if limited.
    pub fn outbound_limit_bps(&self) -> Option<u64> {
        (self.outbound_kbps > 0).then(|| self.outbound_kbps * 1024)
    }
}

/// Peer accounting configuration (`peers.*`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeerConfig {
    /// Window for counting a peer as active, in seconds
    /// (`active_window_secs`). Defaults to 300.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_window_secs: Option<u64>,
}

impl PeerConfig {
    /// Active-peer window in milliseconds, using the default if unset.
    pub fn active_window_ms(&self) -> u64 {
        self.active_window_secs
            .unwrap_or(DEFAULT_ACTIVE_WINDOW_SECS)
            * 1000
    }
}

/// Reachability configuration (`reachability.*`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReachabilityConfig {
    /// Status assumed before any transport has reported (`initial`).
    /// Defaults to the unknown status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<ReachabilityStatus>,
}

impl ReachabilityConfig {
    /// Initial overall status, using the default if unset.
    pub fn initial_status(&self) -> ReachabilityStatus {
        self.initial.unwrap_or(ReachabilityStatus::Unknown)
    }
}

/// Root configuration for the comm subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommConfig {
    /// Bandwidth limits (`bandwidth.*`).
    #[serde(default)]
    pub bandwidth: BandwidthConfig,

    /// Peer accounting (`peers.*`).
    #[serde(default)]
    pub peers: PeerConfig,

    /// Reachability defaults (`reachability.*`).
    #[serde(default)]
    pub reachability: ReachabilityConfig,
}

impl CommConfig {
    /// Create a configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a specific YAML file.
    pub fn load_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::ParseYaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from a file if it exists, else defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load_path(path)
        } else {
            Ok(Self::default())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
