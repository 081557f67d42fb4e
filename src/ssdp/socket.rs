use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

pub const SSDP_MCAST_V4: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);
pub const SSDP_PORT: u16 = 1900;
/// Multicast TTL for everything we send: stay on the local segment.
pub const SSDP_TTL: u32 = 1;

/// Where M-SEARCH and NOTIFY datagrams go by default.
pub fn ssdp_group() -> SocketAddr {
    SocketAddrV4::new(SSDP_MCAST_V4, SSDP_PORT).into()
}

/// Create the socket used to send an M-SEARCH and read the unicast replies.
/// Bound to 0.0.0.0:0 -- replies come back to whatever port the OS picked.
pub fn build_search_socket() -> std::io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_multicast_ttl_v4(SSDP_TTL)?;
    socket.set_nonblocking(true)?;
    let bind_addr: SocketAddr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0).into();
    socket.bind(&bind_addr.into())?;
    let std_udp: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_udp)
}

/// Create the socket NOTIFY listeners read from.
///
/// Binds 0.0.0.0:1900 with SO_REUSEADDR (+ SO_REUSEPORT on unix) so it can
/// coexist with a local UPnP daemon, then joins the SSDP group on every
/// non-loopback IPv4 interface. Falls back to INADDR_ANY when no interface can
/// be enumerated.
pub fn build_listen_socket() -> std::io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    let bind_addr: SocketAddr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, SSDP_PORT).into();
    socket.bind(&bind_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_udp: std::net::UdpSocket = socket.into();
    let tokio_udp = UdpSocket::from_std(std_udp)?;

    let ifaces = list_non_loopback_v4();
    let mut joined = 0usize;
    for iface in &ifaces {
        match tokio_udp.join_multicast_v4(SSDP_MCAST_V4, iface.addr) {
            Ok(()) => {
                tracing::debug!("SSDP: joined group on {} (if {})", iface.addr, iface.index);
                joined += 1;
            }
            Err(e) => tracing::warn!("SSDP: could not join multicast on {}: {}", iface.addr, e),
        }
    }
    if joined == 0 {
        tracing::debug!("SSDP: joining multicast on INADDR_ANY");
        tokio_udp.join_multicast_v4(SSDP_MCAST_V4, Ipv4Addr::UNSPECIFIED)?;
    }
    Ok(tokio_udp)
}

/// Create a socket for sending announcements to the group.
pub fn build_send_socket() -> std::io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_multicast_ttl_v4(SSDP_TTL)?;
    socket.set_nonblocking(true)?;
    let bind_addr: SocketAddr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0).into();
    socket.bind(&bind_addr.into())?;
    let std_udp: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_udp)
}

/// An interface entry: IPv4 address + interface index.
#[derive(Debug, Clone)]
pub struct IfaceV4 {
    pub addr: Ipv4Addr,
    pub index: u32,
}

/// Enumerate non-loopback IPv4 interfaces using the `getifaddrs` crate.
/// Returns empty Vec if enumeration fails; callers fall back to INADDR_ANY.
pub fn list_non_loopback_v4() -> Vec<IfaceV4> {
    use getifaddrs::{Address, InterfaceFlags};

    let Ok(ifaces) = getifaddrs::getifaddrs() else {
        return vec![];
    };
    ifaces
        .filter(|i| !i.flags.contains(InterfaceFlags::LOOPBACK))
        .filter_map(|i| match &i.address {
            Address::V4(net_addr) => Some(IfaceV4 {
                addr: net_addr.address,
                index: i.index.unwrap_or(0),
            }),
            _ => None,
        })
        .collect()
}
