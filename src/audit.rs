//! The audit pipeline: adapters, aggregation, precedence, total order.

use crate::error::Result;
use crate::record::{self, ResolverRecord};
use crate::source::ConfigSource;
use crate::{adapters, precedence};
use std::collections::HashMap;

/// Discovers every resolver configuration touching a set of interfaces
/// and decides which one actually governs each.
///
/// The audit holds no state between runs; each [`run`](Self::run) is a
/// fresh single pass: adapters fire independently, their output is
/// aggregated, the precedence pass stamps activity, and the result
/// comes back in canonical presentation order.
///
/// # Example
///
/// ```rust,ignore
/// use macos_dns_audit::{DnsAudit, SystemConfigSource};
/// use std::collections::HashMap;
///
/// let audit = DnsAudit::new(SystemConfigSource::new())
///     .with_service_names(HashMap::from([
///         ("en0".to_string(), "Wi-Fi".to_string()),
///         ("utun4".to_string(), "AdGuard VPN".to_string()),
///     ]));
///
/// for record in audit.run(&["en0".into(), "utun4".into()])? {
///     println!("{record}");
/// }
/// ```
pub struct DnsAudit<S> {
    source: S,
    service_names: HashMap<String, String>,
}

impl<S: ConfigSource> DnsAudit<S> {
    /// Creates an audit over the given configuration source, with no
    /// interface-to-service mapping (the custom adapter will then
    /// contribute nothing).
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            service_names: HashMap::new(),
        }
    }

    /// Sets the interface-to-service-name mapping used by the custom
    /// adapter. Build one from live `networksetup` output with
    /// [`service_map_from_hardware_ports`], or supply your own.
    #[must_use]
    pub fn with_service_names(mut self, service_names: HashMap<String, String>) -> Self {
        self.service_names = service_names;
        self
    }

    /// Runs the full pipeline over the given interfaces.
    ///
    /// Per-interface lookup failures are logged and under-report; they
    /// never fail the run.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::UnrankedSource`] only if the record set
    /// violates the precedence contract, which the adapters here never
    /// do.
    ///
    /// [`AuditError::UnrankedSource`]: crate::error::AuditError::UnrankedSource
    pub fn run(&self, interfaces: &[String]) -> Result<Vec<ResolverRecord>> {
        let mut records = adapters::custom(&self.source, interfaces, &self.service_names);
        records.extend(adapters::dhcp(&self.source, interfaces));
        records.extend(adapters::vpn(&self.source, interfaces));
        tracing::debug!(
            interfaces = interfaces.len(),
            records = records.len(),
            "Aggregated adapter output"
        );

        precedence::mark_active(&mut records)?;
        record::sort_for_display(&mut records);
        Ok(records)
    }
}

/// Builds the interface-to-service-name map from
/// `networksetup -listallhardwareports` output.
///
/// The output is blank-line-separated blocks of the form:
///
/// ```text
/// Hardware Port: Wi-Fi
/// Device: en0
/// Ethernet Address: aa:bb:cc:dd:ee:ff
/// ```
///
/// Blocks missing either the port or the device line are skipped.
#[must_use]
pub fn service_map_from_hardware_ports(output: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for block in output.split("\n\n") {
        let mut port = None;
        let mut device = None;
        for line in block.lines() {
            if let Some(value) = line.strip_prefix("Hardware Port:") {
                port = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix("Device:") {
                device = Some(value.trim().to_string());
            }
        }
        if let (Some(port), Some(device)) = (port, device) {
            map.insert(device, port);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardware_ports_maps_device_to_service() {
        let output = "Hardware Port: Wi-Fi\nDevice: en0\nEthernet Address: aa:bb:cc:dd:ee:ff\n\nHardware Port: Thunderbolt Ethernet\nDevice: en4\nEthernet Address: 11:22:33:44:55:66\n";
        let map = service_map_from_hardware_ports(output);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("en0").map(String::as_str), Some("Wi-Fi"));
        assert_eq!(
            map.get("en4").map(String::as_str),
            Some("Thunderbolt Ethernet")
        );
    }

    #[test]
    fn hardware_ports_skips_incomplete_blocks() {
        let output = "Hardware Port: Wi-Fi\n\nDevice: en4\n\nHardware Port: Bridge\nDevice: bridge0\n";
        let map = service_map_from_hardware_ports(output);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("bridge0").map(String::as_str), Some("Bridge"));
    }

    #[test]
    fn hardware_ports_empty_output() {
        assert!(service_map_from_hardware_ports("").is_empty());
    }
}
