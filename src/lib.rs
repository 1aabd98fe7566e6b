//! # macos-dns-audit
//!
//! Audit which DNS resolver configuration actually governs each macOS
//! network interface — and why.
//!
//! DNS settings on a Mac can come from three independent places at
//! once: a manual override (`networksetup`), the DHCP lease
//! (`ipconfig getpacket`), and a VPN's scoped configuration
//! (`scutil --dns`). This crate collects all of them per interface,
//! applies the precedence rule that decides which source wins
//! (`Custom > VPN tunnel > DHCP > intercepted VPN`), and returns one
//! deterministic, ordered list of [`ResolverRecord`]s with exactly the
//! governing records flagged active. A tunnel interface that discloses
//! no DNS at all is reported as *VPN Intercepted*, a possible DNS leak
//! or hijack worth surfacing on its own.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use macos_dns_audit::{DnsAudit, SystemConfigSource, interfaces};
//!
//! let audit = DnsAudit::new(SystemConfigSource::new());
//! for record in audit.run(&interfaces::list_active()?)? {
//!     println!("{record}");
//! }
//! ```
//!
//! Output looks like:
//!
//! ```text
//! en0 8.8.8.8 (Custom) [active]
//! en0 192.168.1.1 (Likely DHCP provisioned) [overridden]
//! utun4 10.0.0.1 (VPN Tunnel Provided) [active]
//! ```
//!
//! ## Testing without the OS
//!
//! All external lookups go through the [`ConfigSource`] trait; hand the
//! audit an implementation backed by fixture text and the whole
//! pipeline runs deterministically with no macOS tooling involved.
//!
//! ## Verification
//!
//! Cross-check findings by hand:
//!
//! ```bash
//! scutil --dns                      # scoped resolver configuration
//! networksetup -getdnsservers Wi-Fi # manual override, per service
//! ipconfig getpacket en0            # DHCP lease, per interface
//! ```
//!
//! ## What this crate does not do
//!
//! It never probes resolver reachability, never mutates network state,
//! and keeps nothing between runs. It reports what is configured, not
//! what works.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod audit;
pub mod error;
#[cfg(unix)]
pub mod interfaces;
pub mod precedence;
pub mod provider;
pub mod record;
pub mod source;

pub use audit::{DnsAudit, service_map_from_hardware_ports};
pub use error::{AuditError, Result};
pub use record::{ResolverAddress, ResolverRecord, SourceKind, sort_for_display};
pub use source::{ConfigSource, SystemConfigSource};
