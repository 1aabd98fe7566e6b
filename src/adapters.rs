//! Source adapters: one extraction routine per configuration origin.
//!
//! Each adapter walks the interface list, fetches raw text through the
//! injected [`ConfigSource`], and parses it into records. Adapters know
//! nothing about each other and nothing about precedence; they only tag
//! records with their own [`SourceKind`].
//!
//! A failed lookup for one interface yields zero records from that
//! adapter for that interface and a log line. It never aborts the run:
//! a transient tool failure should under-report, not blow up the audit.

use crate::record::{ResolverAddress, ResolverRecord, SourceKind};
use crate::source::ConfigSource;
use std::collections::HashMap;
use std::net::IpAddr;

/// Substring marking a VPN tunnel interface name (`utun4`, `tun0`, ...).
pub(crate) const TUNNEL_MARKER: &str = "tun";

/// `networksetup -getdnsservers` phrases its empty case as a sentence
/// ("There aren't any DNS Servers set on ...") rather than empty output.
const NO_CUSTOM_SERVERS_MARKER: &str = "aren't";

/// Field label carrying the DNS server list in an `ipconfig getpacket`
/// lease dump.
const DHCP_DNS_FIELD: &str = "domain_name_server";

/// Header separating scoped resolver configuration from the global one
/// in `scutil --dns` output.
const SCOPED_HEADER: &str = "DNS configuration (for scoped queries)";

/// Returns `true` if the interface name looks like a VPN tunnel.
pub(crate) fn is_tunnel_interface(interface: &str) -> bool {
    interface.contains(TUNNEL_MARKER)
}

/// Custom adapter: manually configured DNS servers, per service.
///
/// Interfaces without an entry in `service_names` contribute nothing;
/// the mapping is injected data, not something this crate computes.
pub fn custom<S>(
    source: &S,
    interfaces: &[String],
    service_names: &HashMap<String, String>,
) -> Vec<ResolverRecord>
where
    S: ConfigSource + ?Sized,
{
    let mut records = Vec::new();
    for interface in interfaces {
        let Some(service) = service_names.get(interface) else {
            tracing::debug!(interface = %interface, "No service name known, skipping custom lookup");
            continue;
        };
        match source.custom_dns_servers(service) {
            Ok(output) => records.extend(parse_custom(interface, &output)),
            Err(e) => tracing::warn!(
                interface = %interface,
                service = %service,
                error = %e,
                "Custom DNS lookup failed, skipping interface"
            ),
        }
    }
    records
}

/// Parses a `networksetup -getdnsservers` response for one interface.
fn parse_custom(interface: &str, output: &str) -> Vec<ResolverRecord> {
    if output.contains(NO_CUSTOM_SERVERS_MARKER) {
        return Vec::new();
    }
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            match line.parse::<IpAddr>() {
                Ok(ip) => Some(ResolverRecord::new(interface, ip.into(), SourceKind::Custom)),
                Err(_) => {
                    tracing::debug!(interface = %interface, line = %line, "Unparseable custom DNS line, ignoring");
                    None
                }
            }
        })
        .collect()
}

/// DHCP adapter: DNS servers from the interface's lease packet.
pub fn dhcp<S>(source: &S, interfaces: &[String]) -> Vec<ResolverRecord>
where
    S: ConfigSource + ?Sized,
{
    let mut records = Vec::new();
    for interface in interfaces {
        match source.dhcp_lease(interface) {
            Ok(packet) => records.extend(parse_dhcp_packet(interface, &packet)),
            Err(e) => tracing::warn!(
                interface = %interface,
                error = %e,
                "DHCP lease lookup failed, skipping interface"
            ),
        }
    }
    records
}

/// Parses the `domain_name_server : {a, b}` field out of a lease dump.
///
/// A packet without the field yields no records; so does a field whose
/// value cannot be decomposed into addresses.
fn parse_dhcp_packet(interface: &str, packet: &str) -> Vec<ResolverRecord> {
    let mut records = Vec::new();
    for line in packet.lines() {
        if !line.contains(DHCP_DNS_FIELD) {
            continue;
        }
        let Some((_, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        let value = value
            .strip_prefix('{')
            .and_then(|v| v.strip_suffix('}'))
            .unwrap_or(value);
        for part in value.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match part.parse::<IpAddr>() {
                Ok(ip) => records.push(ResolverRecord::new(
                    interface,
                    ip.into(),
                    SourceKind::DhcpProvisioned,
                )),
                Err(_) => {
                    tracing::debug!(interface = %interface, fragment = %part, "Unparseable DHCP server entry, ignoring");
                }
            }
        }
    }
    records
}

/// VPN adapter: two passes over one `scutil --dns` fetch.
///
/// Pass one parses the scoped-query section into tunnel-provided
/// records. Pass two flags every tunnel interface that the scoped text
/// never mentions as intercepted: the VPN claims the interface but
/// discloses no resolver, which smells like DNS interception and is
/// reported with the unknown-address sentinel.
pub fn vpn<S>(source: &S, interfaces: &[String]) -> Vec<ResolverRecord>
where
    S: ConfigSource + ?Sized,
{
    let blob = match source.scoped_dns() {
        Ok(blob) => blob,
        Err(e) => {
            tracing::warn!(error = %e, "Scoped DNS lookup failed, skipping VPN detection");
            return Vec::new();
        }
    };
    // Everything before the scoped header is global configuration and
    // irrelevant here. A blob without the header has no scoped section.
    let scoped = blob
        .split_once(SCOPED_HEADER)
        .map_or("", |(_, scoped)| scoped);

    let mut records = parse_scoped(scoped);
    for interface in interfaces {
        if is_tunnel_interface(interface) && !scoped.contains(interface.as_str()) {
            tracing::debug!(interface = %interface, "Tunnel interface absent from scoped DNS, flagging as intercepted");
            records.push(ResolverRecord::new(
                interface,
                ResolverAddress::Unknown,
                SourceKind::VpnIntercepted,
            ));
        }
    }
    records
}

/// Parses the scoped-query section into tunnel-provided records.
///
/// Sections are delimited by `resolver #N` lines. Within a section,
/// `if_index : 5 (utun4)` names the interface (last whitespace token,
/// wrapping punctuation stripped) and each `nameserver[i] : <addr>`
/// line contributes one server. Only tunnel interfaces are kept.
fn parse_scoped(scoped: &str) -> Vec<ResolverRecord> {
    let mut records = Vec::new();
    let mut interface: Option<String> = None;
    let mut servers: Vec<IpAddr> = Vec::new();

    for line in scoped.lines() {
        let line = line.trim();
        if line.starts_with("resolver #") {
            flush_section(&mut records, interface.take().as_deref(), &servers);
            servers.clear();
        } else if line.starts_with("if_index") {
            interface = line
                .split_once(':')
                .and_then(|(_, value)| value.split_whitespace().last())
                .map(|token| {
                    token
                        .trim_matches(|c| matches!(c, '(' | ')' | '"' | '\''))
                        .to_string()
                });
        } else if line.starts_with("nameserver") {
            if let Some((_, value)) = line.split_once(':') {
                match value.trim().parse::<IpAddr>() {
                    Ok(ip) => servers.push(ip),
                    Err(_) => {
                        tracing::debug!(line = %line, "Unparseable nameserver line, ignoring");
                    }
                }
            }
        }
    }
    flush_section(&mut records, interface.as_deref(), &servers);
    records
}

fn flush_section(records: &mut Vec<ResolverRecord>, interface: Option<&str>, servers: &[IpAddr]) {
    let Some(interface) = interface else { return };
    if !is_tunnel_interface(interface) {
        return;
    }
    for &ip in servers {
        records.push(ResolverRecord::new(
            interface,
            ip.into(),
            SourceKind::VpnTunnelProvided,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_parses_address_per_line() {
        let records = parse_custom("en0", "8.8.8.8\n2606:4700:4700::1111\n");
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.source == SourceKind::Custom));
        assert!(records.iter().all(|r| r.interface == "en0"));
        assert_eq!(records[0].address, ResolverAddress::Ip("8.8.8.8".parse().unwrap()));
    }

    #[test]
    fn custom_negative_ack_yields_nothing() {
        let output = "There aren't any DNS Servers set on Wi-Fi.";
        assert!(parse_custom("en0", output).is_empty());
    }

    #[test]
    fn custom_skips_unparsable_lines() {
        let records = parse_custom("en0", "8.8.8.8\nnot-an-address\n1.1.1.1\n");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn custom_trims_whitespace() {
        let records = parse_custom("en0", "  8.8.8.8  \n\n");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn dhcp_splits_braced_list() {
        let packet = "op = BOOTREPLY\nsubnet_mask (ip): 255.255.255.0\ndomain_name_server (ip_mult): {8.8.8.8, 1.1.1.1}\n";
        let records = parse_dhcp_packet("en0", packet);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.source == SourceKind::DhcpProvisioned));
        assert_eq!(records[0].address, ResolverAddress::Ip("8.8.8.8".parse().unwrap()));
        assert_eq!(records[1].address, ResolverAddress::Ip("1.1.1.1".parse().unwrap()));
    }

    #[test]
    fn dhcp_single_server() {
        let packet = "domain_name_server (ip_mult): {192.168.1.1}";
        let records = parse_dhcp_packet("en0", packet);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn dhcp_without_field_yields_nothing() {
        let packet = "op = BOOTREPLY\nrouter (ip_mult): {192.168.1.1}\n";
        assert!(parse_dhcp_packet("en0", packet).is_empty());
    }

    #[test]
    fn dhcp_garbage_value_yields_nothing() {
        let packet = "domain_name_server (ip_mult): {not, addresses}";
        assert!(parse_dhcp_packet("en0", packet).is_empty());
    }

    const SCOPED: &str = "\
resolver #1
  search domain[0] : example.com
  nameserver[0] : 10.0.0.1
  nameserver[1] : 10.0.0.2
  if_index : 22 (utun4)
  flags    : Scoped, Request A records
resolver #2
  nameserver[0] : 192.168.1.1
  if_index : 11 (en0)
";

    #[test]
    fn scoped_keeps_only_tunnel_sections() {
        let records = parse_scoped(SCOPED);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.interface == "utun4"));
        assert!(records.iter().all(|r| r.source == SourceKind::VpnTunnelProvided));
        assert_eq!(records[0].address, ResolverAddress::Ip("10.0.0.1".parse().unwrap()));
        assert_eq!(records[1].address, ResolverAddress::Ip("10.0.0.2".parse().unwrap()));
    }

    #[test]
    fn scoped_section_without_if_index_yields_nothing() {
        let scoped = "resolver #1\n  nameserver[0] : 10.0.0.1\n";
        assert!(parse_scoped(scoped).is_empty());
    }

    #[test]
    fn scoped_section_without_nameserver_yields_nothing() {
        let scoped = "resolver #1\n  if_index : 22 (utun4)\n";
        assert!(parse_scoped(scoped).is_empty());
    }

    #[test]
    fn scoped_ipv6_nameserver() {
        let scoped = "resolver #1\n  if_index : 22 (utun4)\n  nameserver[0] : 2606:4700:4700::1111\n";
        let records = parse_scoped(scoped);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].address,
            ResolverAddress::Ip("2606:4700:4700::1111".parse().unwrap())
        );
    }

    #[test]
    fn tunnel_marker_matches_utun_and_tun() {
        assert!(is_tunnel_interface("utun4"));
        assert!(is_tunnel_interface("tun0"));
        assert!(!is_tunnel_interface("en0"));
        assert!(!is_tunnel_interface("bridge0"));
    }
}
