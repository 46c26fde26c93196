//! Reachability Classification
//!
//! Combines independent per-address-family observations (IPv4, IPv6)
//! into one overall [`ReachabilityStatus`]. Each status carries a
//! stable numeric code and a human-readable label; a separate badness
//! ranking orders statuses from most-connectable to least, so callers
//! can pick the worse of two observations.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ============================================================================
// Per-Family State
// ============================================================================

/// Reachability of a single address family, as observed by a transport.
///
/// IPv4 and IPv6 are classified independently before combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FamilyState {
    /// Unsolicited inbound connections work.
    Ok,
    /// Probing still in progress, result unknown.
    Testing,
    /// Outbound works but unsolicited inbound is blocked.
    Firewalled,
    /// Family disabled by configuration.
    Disabled,
    /// Externally visible address varies per remote peer (IPv4 only).
    SymmetricNat,
    /// No usable interface for this family.
    Disconnected,
    /// The reachability detector itself failed (e.g. probe bind error).
    Hosed,
}

impl FamilyState {
    /// Check whether this family can currently accept unsolicited
    /// inbound connections.
    pub fn is_reachable(&self) -> bool {
        matches!(self, FamilyState::Ok)
    }

    /// Check whether this family can still originate connections.
    pub fn can_originate(&self) -> bool {
        matches!(
            self,
            FamilyState::Ok | FamilyState::Testing | FamilyState::Firewalled | FamilyState::SymmetricNat
        )
    }
}

impl fmt::Display for FamilyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FamilyState::Ok => "ok",
            FamilyState::Testing => "testing",
            FamilyState::Firewalled => "firewalled",
            FamilyState::Disabled => "disabled",
            FamilyState::SymmetricNat => "symmetric-nat",
            FamilyState::Disconnected => "disconnected",
            FamilyState::Hosed => "hosed",
        };
        write!(f, "{}", s)
    }
}

// ============================================================================
// Overall Status
// ============================================================================

/// Overall reachability of the router, combined across both families.
///
/// The variants form a closed set with stable numeric codes. Comparison
/// (`Ord`) is by badness rank, not by code: the two orders agree for
/// every variant except `Unknown`, which sorts last by explicit rule.
///
/// Serialized in kebab-case ("ipv4-ok-ipv6-unknown") for config files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReachabilityStatus {
    /// Unsolicited connections work on all enabled transports.
    Ok,
    /// IPv4 reachable; IPv6 still being probed.
    Ipv4OkIpv6Unknown,
    /// IPv4 reachable; IPv6 firewalled.
    Ipv4OkIpv6Firewalled,
    /// IPv4 still being probed; IPv6 reachable.
    Ipv4UnknownIpv6Ok,
    /// IPv4 firewalled; IPv6 reachable.
    Ipv4FirewalledIpv6Ok,
    /// IPv4 disabled; IPv6 reachable.
    Ipv4DisabledIpv6Ok,
    /// Behind a symmetric NAT: our apparent address differs per peer.
    Different,
    /// IPv4 firewalled; IPv6 still being probed.
    Ipv4FirewalledIpv6Unknown,
    /// Firewalled on all enabled transports; outbound still works.
    RejectUnsolicited,
    /// IPv4 still being probed; IPv6 firewalled.
    Ipv4UnknownIpv6Firewalled,
    /// IPv4 disabled; IPv6 still being probed.
    Ipv4DisabledIpv6Unknown,
    /// IPv4 disabled; IPv6 firewalled.
    Ipv4DisabledIpv6Firewalled,
    /// No usable network interface on any enabled transport.
    Disconnected,
    /// The detection system itself is broken (probe bind failed).
    Hosed,
    /// Reachability unknown on all enabled transports.
    Unknown,
}

/// All status variants, in code order.
pub const ALL_STATUSES: [ReachabilityStatus; 15] = [
    ReachabilityStatus::Ok,
    ReachabilityStatus::Ipv4OkIpv6Unknown,
    ReachabilityStatus::Ipv4OkIpv6Firewalled,
    ReachabilityStatus::Ipv4UnknownIpv6Ok,
    ReachabilityStatus::Ipv4FirewalledIpv6Ok,
    ReachabilityStatus::Ipv4DisabledIpv6Ok,
    ReachabilityStatus::Different,
    ReachabilityStatus::Ipv4FirewalledIpv6Unknown,
    ReachabilityStatus::RejectUnsolicited,
    ReachabilityStatus::Ipv4UnknownIpv6Firewalled,
    ReachabilityStatus::Ipv4DisabledIpv6Unknown,
    ReachabilityStatus::Ipv4DisabledIpv6Firewalled,
    ReachabilityStatus::Disconnected,
    ReachabilityStatus::Hosed,
    ReachabilityStatus::Unknown,
];

impl ReachabilityStatus {
    /// Stable numeric code for this status.
    ///
    /// Codes are wire/UI-stable and must never be renumbered.
    pub fn code(&self) -> u8 {
        match self {
            ReachabilityStatus::Ok => 0,
            ReachabilityStatus::Ipv4OkIpv6Unknown => 1,
            ReachabilityStatus::Ipv4OkIpv6Firewalled => 2,
            ReachabilityStatus::Ipv4UnknownIpv6Ok => 3,
            ReachabilityStatus::Ipv4FirewalledIpv6Ok => 4,
            ReachabilityStatus::Ipv4DisabledIpv6Ok => 5,
            ReachabilityStatus::Different => 6,
            ReachabilityStatus::Ipv4FirewalledIpv6Unknown => 7,
            ReachabilityStatus::RejectUnsolicited => 8,
            ReachabilityStatus::Ipv4UnknownIpv6Firewalled => 9,
            ReachabilityStatus::Ipv4DisabledIpv6Unknown => 10,
            ReachabilityStatus::Ipv4DisabledIpv6Firewalled => 11,
            ReachabilityStatus::Disconnected => 12,
            ReachabilityStatus::Hosed => 13,
            ReachabilityStatus::Unknown => 14,
        }
    }

    /// Human-readable status label (untranslated).
    pub fn label(&self) -> &'static str {
        match self {
            ReachabilityStatus::Ok => "OK",
            ReachabilityStatus::Ipv4OkIpv6Unknown => "IPv4: OK; IPv6: Testing",
            ReachabilityStatus::Ipv4OkIpv6Firewalled => "IPv4: OK; IPv6: Firewalled",
            ReachabilityStatus::Ipv4UnknownIpv6Ok => "IPv4: Testing; IPv6: OK",
            ReachabilityStatus::Ipv4FirewalledIpv6Ok => "IPv4: Firewalled; IPv6: OK",
            ReachabilityStatus::Ipv4DisabledIpv6Ok => "IPv4: Disabled; IPv6: OK",
            ReachabilityStatus::Different => "Symmetric NAT",
            ReachabilityStatus::Ipv4FirewalledIpv6Unknown => "IPv4: Firewalled; IPv6: Unknown",
            ReachabilityStatus::RejectUnsolicited => "Firewalled",
            ReachabilityStatus::Ipv4UnknownIpv6Firewalled => "IPv4: Testing; IPv6: Firewalled",
            ReachabilityStatus::Ipv4DisabledIpv6Unknown => "IPv4: Disabled; IPv6: Unknown",
            ReachabilityStatus::Ipv4DisabledIpv6Firewalled => "IPv4: Disabled; IPv6: Firewalled",
            ReachabilityStatus::Disconnected => "Disconnected",
            ReachabilityStatus::Hosed => "Port Conflict",
            ReachabilityStatus::Unknown => "Testing",
        }
    }

    /// Badness rank: strictly increasing from most-connectable to
    /// most-broken.
    ///
    /// Equal to `code()` for every variant except `Unknown`, which must
    /// sort last regardless of its code. Telling a caller "unknown" is
    /// never a better answer than any concrete classification, so the
    /// rank is pinned past the end of the code space.
    pub fn badness(&self) -> u8 {
        match self {
            ReachabilityStatus::Unknown => u8::MAX,
            other => other.code(),
        }
    }

    /// Pick the worse of two statuses, per the badness ranking.
    pub fn worse_of(a: ReachabilityStatus, b: ReachabilityStatus) -> ReachabilityStatus {
        if a.badness() >= b.badness() {
            a
        } else {
            b
        }
    }

    /// Check whether at least one family accepts unsolicited inbound.
    pub fn is_reachable(&self) -> bool {
        matches!(
            self,
            ReachabilityStatus::Ok
                | ReachabilityStatus::Ipv4OkIpv6Unknown
                | ReachabilityStatus::Ipv4OkIpv6Firewalled
                | ReachabilityStatus::Ipv4UnknownIpv6Ok
                | ReachabilityStatus::Ipv4FirewalledIpv6Ok
                | ReachabilityStatus::Ipv4DisabledIpv6Ok
        )
    }

    /// Check whether the router has no connectivity at all.
    pub fn is_disconnected(&self) -> bool {
        matches!(self, ReachabilityStatus::Disconnected)
    }
}

impl PartialOrd for ReachabilityStatus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ReachabilityStatus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.badness().cmp(&other.badness())
    }
}

impl fmt::Display for ReachabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.code())
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Combine per-family observations into one overall status.
///
/// Pure, total and deterministic. Overrides are applied before the
/// combination table, in fixed precedence:
///
/// 1. Either family `Hosed` (detector broken) wins outright: no
///    observation made by a broken detector can be trusted, including
///    the symmetric-NAT one.
/// 2. IPv4 `SymmetricNat` yields `Different` regardless of IPv6.
/// 3. Both families `Disconnected` yields `Disconnected`.
///
/// After the overrides, a single `Disconnected` family is folded into
/// `Disabled` (a family with no interface can neither accept nor
/// originate) and the 4x4 table below decides.
pub fn classify(v4: FamilyState, v6: FamilyState) -> ReachabilityStatus {
    use FamilyState::*;
    use ReachabilityStatus as S;

    if v4 == Hosed || v6 == Hosed {
        return S::Hosed;
    }
    if v4 == SymmetricNat {
        return S::Different;
    }
    if v4 == Disconnected && v6 == Disconnected {
        return S::Disconnected;
    }

    // Symmetric NAT is an IPv4-only observation.
    debug_assert!(v6 != SymmetricNat, "symmetric NAT reported for IPv6");

    let v4 = if v4 == Disconnected { Disabled } else { v4 };
    let v6 = match v6 {
        Disconnected => Disabled,
        SymmetricNat => Testing,
        other => other,
    };

    match (v4, v6) {
        (Ok, Ok) => S::Ok,
        (Ok, Testing) => S::Ipv4OkIpv6Unknown,
        (Ok, Firewalled) => S::Ipv4OkIpv6Firewalled,
        (Ok, Disabled) => S::Ok,

        (Testing, Ok) => S::Ipv4UnknownIpv6Ok,
        (Testing, Testing) => S::Unknown,
        (Testing, Firewalled) => S::Ipv4UnknownIpv6Firewalled,
        (Testing, Disabled) => S::Unknown,

        (Firewalled, Ok) => S::Ipv4FirewalledIpv6Ok,
        (Firewalled, Testing) => S::Ipv4FirewalledIpv6Unknown,
        (Firewalled, Firewalled) => S::RejectUnsolicited,
        (Firewalled, Disabled) => S::RejectUnsolicited,

        (Disabled, Ok) => S::Ipv4DisabledIpv6Ok,
        (Disabled, Testing) => S::Ipv4DisabledIpv6Unknown,
        (Disabled, Firewalled) => S::Ipv4DisabledIpv6Firewalled,
        (Disabled, Disabled) => S::Disconnected,

        // Unreachable: overrides and folds above remove these states.
        (SymmetricNat | Disconnected | Hosed, _) | (_, SymmetricNat | Disconnected | Hosed) => {
            unreachable!("family state not normalized before table lookup")
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
