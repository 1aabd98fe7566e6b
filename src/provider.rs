//! Well-known public DNS provider labels.

use std::net::IpAddr;

/// Returns the operator label for a well-known public resolver address.
///
/// Covers Google, Cloudflare, Quad9, OpenDNS and CleanBrowsing anycast
/// addresses, v4 and v6. Anything else returns `None`.
#[must_use]
pub fn provider_name(address: IpAddr) -> Option<&'static str> {
    match address {
        IpAddr::V4(v4) => match v4.octets() {
            [8, 8, 8, 8] | [8, 8, 4, 4] => Some("Google"),
            [1, 1, 1, 1] | [1, 0, 0, 1] => Some("Cloudflare"),
            [9, 9, 9, 9] | [149, 112, 112, 112] => Some("Quad9"),
            [208, 67, 222, 222] | [208, 67, 220, 220] => Some("OpenDNS"),
            [185, 228, 168, 9] | [185, 228, 169, 9] => Some("CleanBrowsing"),
            _ => None,
        },
        IpAddr::V6(v6) => match v6.segments() {
            [0x2001, 0x4860, 0x4860, 0, 0, 0, 0, 0x8888 | 0x8844] => Some("Google"),
            [0x2606, 0x4700, 0x4700, 0, 0, 0, 0, 0x1111 | 0x1001] => Some("Cloudflare"),
            [0x2620, 0xfe, 0, 0, 0, 0, 0, 0xfe | 0x9] => Some("Quad9"),
            [0x2620, 0x119, 0x35, 0, 0, 0, 0, 0x35]
            | [0x2620, 0x119, 0x53, 0, 0, 0, 0, 0x53] => Some("OpenDNS"),
            [0x2a0d, 0x2a00, 1 | 2, 0, 0, 0, 0, 2] => Some("CleanBrowsing"),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(addr: &str) -> Option<&'static str> {
        provider_name(addr.parse().unwrap())
    }

    #[test]
    fn known_v4_resolvers() {
        assert_eq!(name("8.8.8.8"), Some("Google"));
        assert_eq!(name("1.0.0.1"), Some("Cloudflare"));
        assert_eq!(name("9.9.9.9"), Some("Quad9"));
        assert_eq!(name("208.67.220.220"), Some("OpenDNS"));
        assert_eq!(name("185.228.168.9"), Some("CleanBrowsing"));
    }

    #[test]
    fn known_v6_resolvers() {
        assert_eq!(name("2001:4860:4860::8888"), Some("Google"));
        assert_eq!(name("2606:4700:4700::1001"), Some("Cloudflare"));
        assert_eq!(name("2620:fe::9"), Some("Quad9"));
        assert_eq!(name("2620:119:53::53"), Some("OpenDNS"));
        assert_eq!(name("2a0d:2a00:1::2"), Some("CleanBrowsing"));
    }

    #[test]
    fn unknown_addresses() {
        assert_eq!(name("192.168.1.1"), None);
        assert_eq!(name("8.8.8.9"), None);
        assert_eq!(name("2001:4860:4860::1"), None);
    }
}
