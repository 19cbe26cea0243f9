use std::fmt;
use std::io;
use std::net::{IpAddr, UdpSocket};

#[derive(Debug)]
pub struct HostResolutionError(io::Error);

impl fmt::Display for HostResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "local address resolution failed: {}", self.0)
    }
}

impl std::error::Error for HostResolutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Resolve the address this host uses to reach the network.
///
/// A connected UDP socket picks the outbound local address without
/// sending any datagram.
pub fn resolve() -> Result<IpAddr, HostResolutionError> {
    probe().map_err(HostResolutionError)
}

fn probe() -> io::Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect("8.8.8.8:80")?;
    Ok(socket.local_addr()?.ip())
}
