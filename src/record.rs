//! Resolver records: where a DNS server came from, and how records are
//! ordered for display.
//!
//! Two distinct rankings live here. The *override* table (in
//! [`crate::precedence`]) decides which source actually governs DNS on an
//! interface; the *presentation* rank below only decides listing order.
//! They deliberately disagree and must not be merged.

use std::cmp::Ordering;
use std::fmt;
use std::net::IpAddr;

/// Origin category of a resolver record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Manually configured via `networksetup -setdnsservers`.
    Custom,
    /// Handed out in the interface's DHCP lease.
    DhcpProvisioned,
    /// Published by a VPN tunnel through the scoped DNS configuration.
    VpnTunnelProvided,
    /// A tunnel interface is up but discloses no DNS configuration at
    /// all. The tunnel is almost certainly intercepting queries; worth
    /// surfacing distinctly from "no VPN".
    VpnIntercepted,
    /// Could not be classified. Adapters never emit this; it exists so
    /// downstream consumers have a defensive default to pattern-match.
    Unknown,
}

impl SourceKind {
    /// Rank in the override-precedence table. Higher wins.
    ///
    /// `Unknown` has no rank by design: it must never compete for an
    /// interface, and the precedence pass errors if it shows up.
    pub(crate) const fn override_rank(self) -> Option<u8> {
        match self {
            Self::Custom => Some(3),
            Self::VpnTunnelProvided => Some(2),
            Self::DhcpProvisioned => Some(1),
            Self::VpnIntercepted => Some(0),
            Self::Unknown => None,
        }
    }

    /// Rank in the presentation-priority table. Lower lists first.
    ///
    /// Note the relative order differs from [`Self::override_rank`]:
    /// DHCP lists after tunnel-provided but *outranks* nothing it
    /// doesn't also outrank there, while `Unknown` simply lists last.
    const fn presentation_rank(self) -> u8 {
        match self {
            Self::Custom => 0,
            Self::VpnTunnelProvided => 1,
            Self::DhcpProvisioned => 2,
            Self::VpnIntercepted => 3,
            Self::Unknown => 4,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Custom => "Custom",
            Self::DhcpProvisioned => "Likely DHCP provisioned",
            Self::VpnTunnelProvided => "VPN Tunnel Provided",
            Self::VpnIntercepted => "VPN Intercepted",
            Self::Unknown => "Unknown",
        })
    }
}

/// A resolver's address, or the sentinel for "no address is known".
///
/// The sentinel occurs only on [`SourceKind::VpnIntercepted`] records,
/// where a tunnel claims the interface without disclosing a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverAddress {
    /// A concrete IPv4 or IPv6 server address.
    Ip(IpAddr),
    /// No server address could be determined.
    Unknown,
}

impl ResolverAddress {
    /// Returns the concrete address, if one is known.
    #[must_use]
    pub const fn ip(&self) -> Option<IpAddr> {
        match self {
            Self::Ip(ip) => Some(*ip),
            Self::Unknown => None,
        }
    }

    /// Returns `true` for the unknown-address sentinel.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Comparison key: IPv4 before IPv6, each by numeric value, the
    /// sentinel after every real address.
    const fn sort_key(self) -> AddressKey {
        match self {
            Self::Ip(IpAddr::V4(v4)) => AddressKey::V4(v4.to_bits()),
            Self::Ip(IpAddr::V6(v6)) => AddressKey::V6(v6.to_bits()),
            Self::Unknown => AddressKey::Sentinel,
        }
    }
}

impl From<IpAddr> for ResolverAddress {
    fn from(ip: IpAddr) -> Self {
        Self::Ip(ip)
    }
}

impl fmt::Display for ResolverAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(ip) => ip.fmt(f),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Variant order is the sort order.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum AddressKey {
    V4(u32),
    V6(u128),
    Sentinel,
}

/// One `(interface, address, source)` finding.
///
/// Records are produced by the source adapters with `is_active = None`,
/// stamped exactly once by [`crate::precedence::mark_active`], and then
/// only read. `None` means the precedence pass has not run yet; reading
/// an activity decision out of it at that point is a caller bug the type
/// makes visible instead of silently answering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverRecord {
    /// OS interface name, e.g. `en0` or `utun4`. Not validated here.
    pub interface: String,
    /// The resolver address, or the unknown sentinel.
    pub address: ResolverAddress,
    /// Which configuration origin reported this resolver.
    pub source: SourceKind,
    /// Whether this record governs DNS on its interface. `None` until
    /// the precedence pass has run over the full record set.
    pub is_active: Option<bool>,
}

impl ResolverRecord {
    /// Creates a record with the active flag not yet computed.
    #[must_use]
    pub fn new(
        interface: impl Into<String>,
        address: ResolverAddress,
        source: SourceKind,
    ) -> Self {
        Self {
            interface: interface.into(),
            address,
            source,
            is_active: None,
        }
    }

    /// Presentation order: interface name, then presentation rank of the
    /// source kind, then address (IPv4 before IPv6, sentinel last).
    ///
    /// This is a strict total order over distinct records as long as no
    /// two records are field-for-field equal, which the adapters
    /// guarantee per pipeline run.
    #[must_use]
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        (
            self.interface.as_str(),
            self.source.presentation_rank(),
            self.address.sort_key(),
        )
            .cmp(&(
                other.interface.as_str(),
                other.source.presentation_rank(),
                other.address.sort_key(),
            ))
    }
}

impl fmt::Display for ResolverRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.interface, self.address, self.source)?;
        match self.is_active {
            Some(true) => write!(f, " [active]"),
            Some(false) => write!(f, " [overridden]"),
            None => Ok(()),
        }
    }
}

/// Sorts records into the canonical presentation order.
pub fn sort_for_display(records: &mut [ResolverRecord]) {
    records.sort_by(|a, b| a.display_cmp(b));
}
