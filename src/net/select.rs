use std::net::Ipv4Addr;

/// One IPv4 address assigned to a network interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddr {
    pub name: String,
    pub addr: Ipv4Addr,
    /// The interface itself is a loopback device.
    pub loopback: bool,
}

/// Which heuristic produced an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// An interface the OS wireless subsystem reports.
    Wireless,
    /// An interface whose name looks like a WiFi adapter.
    WifiName,
    /// Any other non-loopback interface.
    Fallback,
}

/// True for 10.0.0.0/8, 172.16.0.0/12 and 192.168.0.0/16.
pub fn is_private(addr: Ipv4Addr) -> bool {
    let [a, b, ..] = addr.octets();
    match a {
        10 => true,
        172 => (16..=31).contains(&b),
        192 => b == 168,
        _ => false,
    }
}

/// An address worth showing to a user on the same LAN.
pub fn is_usable(addr: Ipv4Addr) -> bool {
    !addr.is_loopback() && !addr.is_link_local() && is_private(addr)
}

pub fn looks_like_wifi(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name.contains("wlan") || name.contains("wifi") || name.starts_with("wl")
}

/// Picks the address the server is most likely reachable at.
///
/// Tries, in order, interfaces named in `wireless`, interfaces whose name
/// looks like WiFi, and finally any non-loopback interface. Within a stage
/// the first usable address wins.
pub fn select_address(wireless: &[String], interfaces: &[InterfaceAddr]) -> Option<(Ipv4Addr, Source)> {
    first_usable(interfaces, Source::Wireless, |iface| wireless.iter().any(|w| *w == iface.name))
        .or_else(|| first_usable(interfaces, Source::WifiName, |iface| looks_like_wifi(&iface.name)))
        .or_else(|| first_usable(interfaces, Source::Fallback, |_| true))
}

fn first_usable<F>(interfaces: &[InterfaceAddr], source: Source, pred: F) -> Option<(Ipv4Addr, Source)>
where
    F: Fn(&InterfaceAddr) -> bool,
{
    interfaces
        .iter()
        .find(|iface| !iface.loopback && pred(iface) && is_usable(iface.addr))
        .map(|iface| (iface.addr, source))
}
