use std::net::IpAddr;
use pnet::packet::Packet;
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::ipv6::Ipv6Packet;
use pnet::packet::tcp::TcpPacket;
use super::flow::Segment;

/// Decode a captured frame into a `Segment`. Frames without an IP layer
/// or whose IP payload is not TCP yield `None`.
///
/// `bytes` is the original wire length, which may exceed the captured
/// slice when a snaplen is in effect.
pub fn decode(data: &[u8], bytes: u64) -> Option<Segment> {
    let eth = EthernetPacket::new(data)?;
    match eth.get_ethertype() {
        EtherTypes::Ipv4 => ipv4(eth.payload(), bytes),
        EtherTypes::Ipv6 => ipv6(eth.payload(), bytes),
        _                => None,
    }
}

fn ipv4(payload: &[u8], bytes: u64) -> Option<Segment> {
    let ip = Ipv4Packet::new(payload)?;

    if ip.get_next_level_protocol() != IpNextHeaderProtocols::Tcp {
        return None;
    }

    let tcp = TcpPacket::new(ip.payload())?;

    Some(Segment {
        src:   IpAddr::V4(ip.get_source()),
        dst:   IpAddr::V4(ip.get_destination()),
        sport: tcp.get_source(),
        dport: tcp.get_destination(),
        bytes: bytes,
    })
}

fn ipv6(payload: &[u8], bytes: u64) -> Option<Segment> {
    let ip = Ipv6Packet::new(payload)?;

    if ip.get_next_header() != IpNextHeaderProtocols::Tcp {
        return None;
    }

    let tcp = TcpPacket::new(ip.payload())?;

    Some(Segment {
        src:   IpAddr::V6(ip.get_source()),
        dst:   IpAddr::V6(ip.get_destination()),
        sport: tcp.get_source(),
        dport: tcp.get_destination(),
        bytes: bytes,
    })
}
