//! Local IPv4 address discovery.
//!
//! Used by the host to show a LAN-reachable URL for the server; the server
//! itself always binds `0.0.0.0`. Address selection lives in [`select`];
//! this module gathers the inputs from the operating system.

pub mod select;

use std::net::Ipv4Addr;

pub use select::{InterfaceAddr, Source};

/// Kernel list of wireless interfaces on Linux.
const PROC_NET_WIRELESS: &str = "/proc/net/wireless";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryError {
    /// No interface has a usable private IPv4 address.
    NotFound,
}

impl std::fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryError::NotFound => f.write_str("no local network address found"),
        }
    }
}

impl std::error::Error for DiscoveryError {}

/// The private IPv4 address this device most likely has on its WiFi network.
pub fn wifi_ip_address() -> Result<Ipv4Addr, DiscoveryError> {
    let (addr, source) = select::select_address(&wireless_interfaces(), &interface_addrs())
        .ok_or(DiscoveryError::NotFound)?;
    tracing::debug!(%addr, ?source, "Discovered local address");
    Ok(addr)
}

/// Whether a WiFi interface currently holds a usable address.
pub fn is_wifi_connected() -> bool {
    matches!(
        select::select_address(&wireless_interfaces(), &interface_addrs()),
        Some((_, Source::Wireless | Source::WifiName))
    )
}

/// Interface names reported by the wireless subsystem. Empty where there is
/// no such report.
pub fn wireless_interfaces() -> Vec<String> {
    match std::fs::read_to_string(PROC_NET_WIRELESS) {
        Ok(text) => parse_proc_net_wireless(&text),
        Err(_) => Vec::new(),
    }
}

/// Parses `/proc/net/wireless`: two header lines, then one `name: stats`
/// line per interface.
pub fn parse_proc_net_wireless(text: &str) -> Vec<String> {
    text.lines()
        .skip(2)
        .filter_map(|line| line.split_once(':'))
        .map(|(name, _)| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Every IPv4 address on every interface, in OS order.
#[cfg(unix)]
pub fn interface_addrs() -> Vec<InterfaceAddr> {
    use nix::ifaddrs::getifaddrs;
    use nix::net::if_::InterfaceFlags;
    use std::net::SocketAddrV4;

    let addrs = match getifaddrs() {
        Ok(addrs) => addrs,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to enumerate network interfaces");
            return Vec::new();
        }
    };

    addrs
        .filter_map(|ifaddr| {
            let sin = *ifaddr.address.as_ref()?.as_sockaddr_in()?;
            Some(InterfaceAddr {
                addr: *SocketAddrV4::from(sin).ip(),
                loopback: ifaddr.flags.contains(InterfaceFlags::IFF_LOOPBACK),
                name: ifaddr.interface_name,
            })
        })
        .collect()
}

#[cfg(not(unix))]
pub fn interface_addrs() -> Vec<InterfaceAddr> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wireless_report() {
        let text = "\
Inter-| sta-|   Quality        |   Discarded packets               | Missed | WE
 face | tus | link level noise |  nwid  crypt   frag  retry   misc | beacon | 22
 wlp2s0: 0000   56.  -54.  -256        0      0      0      0     12        0
  wlan1: 0000   40.  -70.  -256        0      0      0      0      0        0
";
        assert_eq!(parse_proc_net_wireless(text), vec!["wlp2s0", "wlan1"]);
    }

    #[test]
    fn header_only_report_is_empty() {
        let text = "Inter-| sta-|\n face | tus |\n";
        assert!(parse_proc_net_wireless(text).is_empty());
    }
}
