use std::net::IpAddr;
use super::service::Service;

/// One observed TCP segment, reduced to what accounting needs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Segment {
    pub src:   IpAddr,
    pub dst:   IpAddr,
    pub sport: u16,
    pub dport: u16,
    pub bytes: u64,
}

/// Accumulator key: one row per (address, service) pair per window.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Key(pub IpAddr, pub Service);

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Counters {
    pub sent:     u64,
    pub received: u64,
}
