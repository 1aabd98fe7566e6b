//! Host network-interface enumeration.
//!
//! Thin wrapper over `getifaddrs(3)` producing one entry per interface
//! with its up flag and best-known IPv4/IPv6 address. Feeds the audit
//! pipeline with real interface names; tests feed it fixtures instead.

use crate::error::{AuditError, Result};
use std::ffi::CStr;
use std::net::{Ipv4Addr, Ipv6Addr};

/// One host network interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    /// OS device name (`en0`, `utun4`, `lo0`, ...).
    pub name: String,
    /// Whether the interface is administratively up (`IFF_UP`).
    pub is_up: bool,
    /// First IPv4 address, if any.
    pub ipv4: Option<Ipv4Addr>,
    /// Best IPv6 address: global preferred over link-local.
    pub ipv6: Option<Ipv6Addr>,
}

/// Lists all interfaces, one entry per device name.
///
/// Addresses from multiple `getifaddrs` entries for the same device are
/// merged into one [`Interface`].
///
/// # Errors
///
/// Returns [`AuditError::InterfaceEnumeration`] if `getifaddrs` fails.
pub fn list() -> Result<Vec<Interface>> {
    let mut addrs: *mut libc::ifaddrs = std::ptr::null_mut();
    // SAFETY: getifaddrs allocates the list into `addrs`; freed below.
    if unsafe { libc::getifaddrs(&mut addrs) } != 0 {
        return Err(AuditError::InterfaceEnumeration(
            std::io::Error::last_os_error().to_string(),
        ));
    }

    let mut interfaces: Vec<Interface> = Vec::new();
    let mut cursor = addrs;
    while !cursor.is_null() {
        // SAFETY: cursor walks the linked list getifaddrs returned; it
        // stays valid until freeifaddrs.
        let entry = unsafe { &*cursor };
        cursor = entry.ifa_next;

        // SAFETY: ifa_name is a NUL-terminated string for every entry.
        let name = unsafe { CStr::from_ptr(entry.ifa_name) }
            .to_string_lossy()
            .into_owned();
        #[allow(clippy::cast_sign_loss)]
        let is_up = entry.ifa_flags & (libc::IFF_UP as libc::c_uint) != 0;

        let idx = interfaces
            .iter()
            .position(|i| i.name == name)
            .unwrap_or_else(|| {
                interfaces.push(Interface {
                    name,
                    is_up: false,
                    ipv4: None,
                    ipv6: None,
                });
                interfaces.len() - 1
            });
        let interface = &mut interfaces[idx];
        interface.is_up |= is_up;

        if entry.ifa_addr.is_null() {
            continue;
        }
        // SAFETY: ifa_addr is non-null here; sa_family is always valid
        // to read through the generic sockaddr view.
        let family = i32::from(unsafe { (*entry.ifa_addr).sa_family });
        if family == libc::AF_INET {
            // SAFETY: AF_INET guarantees the sockaddr is a sockaddr_in.
            let sin = unsafe { &*entry.ifa_addr.cast::<libc::sockaddr_in>() };
            let ip = Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr));
            if interface.ipv4.is_none() {
                interface.ipv4 = Some(ip);
            }
        } else if family == libc::AF_INET6 {
            // SAFETY: AF_INET6 guarantees the sockaddr is a sockaddr_in6.
            let sin6 = unsafe { &*entry.ifa_addr.cast::<libc::sockaddr_in6>() };
            let ip = Ipv6Addr::from(sin6.sin6_addr.s6_addr);
            merge_ipv6(&mut interface.ipv6, ip);
        }
    }

    // SAFETY: addrs came from a successful getifaddrs and is freed
    // exactly once.
    unsafe { libc::freeifaddrs(addrs) };
    Ok(interfaces)
}

/// Lists the names of interfaces that are up.
///
/// # Errors
///
/// Returns [`AuditError::InterfaceEnumeration`] if `getifaddrs` fails.
pub fn list_active() -> Result<Vec<String>> {
    Ok(list()?
        .into_iter()
        .filter(|i| i.is_up)
        .map(|i| i.name)
        .collect())
}

/// Keeps the best IPv6 address: the first global one wins, link-local
/// (`fe80::/10`) is only a fallback.
fn merge_ipv6(slot: &mut Option<Ipv6Addr>, candidate: Ipv6Addr) {
    let candidate_link_local = is_link_local(candidate);
    match slot {
        None => *slot = Some(candidate),
        Some(current) if is_link_local(*current) && !candidate_link_local => {
            *slot = Some(candidate);
        }
        Some(_) => {}
    }
}

const fn is_link_local(ip: Ipv6Addr) -> bool {
    ip.segments()[0] & 0xffc0 == 0xfe80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_is_listed_and_up() {
        let interfaces = list().unwrap();
        assert!(!interfaces.is_empty());
        let lo = interfaces
            .iter()
            .find(|i| i.name.starts_with("lo"))
            .expect("host has no loopback interface");
        assert!(lo.is_up);
        assert_eq!(lo.ipv4, Some(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn active_is_subset_of_all() {
        let all: Vec<String> = list().unwrap().into_iter().map(|i| i.name).collect();
        for name in list_active().unwrap() {
            assert!(all.contains(&name));
        }
    }

    #[test]
    fn global_ipv6_preferred_over_link_local() {
        let link_local: Ipv6Addr = "fe80::1".parse().unwrap();
        let global: Ipv6Addr = "2001:db8::1".parse().unwrap();

        let mut slot = None;
        merge_ipv6(&mut slot, link_local);
        assert_eq!(slot, Some(link_local));
        merge_ipv6(&mut slot, global);
        assert_eq!(slot, Some(global));
        // A later link-local never displaces a global address.
        merge_ipv6(&mut slot, link_local);
        assert_eq!(slot, Some(global));
    }

    #[test]
    fn link_local_detection() {
        assert!(is_link_local("fe80::1".parse().unwrap()));
        assert!(is_link_local("febf::1".parse().unwrap()));
        assert!(!is_link_local("fec0::1".parse().unwrap()));
        assert!(!is_link_local("::1".parse().unwrap()));
        assert!(!is_link_local("2606:4700:4700::1111".parse().unwrap()));
    }
}
