use std::net::IpAddr;
use serde::{Deserialize, Serialize};
use crate::capture::{Counters, Key, Service};

/// One aggregated row of the record log. Field names follow the on-disk
/// CSV column order.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct TrafficRecord {
    #[serde(rename = "data_hora")]
    pub timestamp: String,
    #[serde(rename = "ip")]
    pub address:   IpAddr,
    #[serde(rename = "protocolo")]
    pub service:   Service,
    #[serde(rename = "bytes_enviados")]
    pub sent:      u64,
    #[serde(rename = "bytes_recebidos")]
    pub received:  u64,
    #[serde(rename = "tipo")]
    pub role:      Role,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub enum Role {
    #[serde(rename = "remetente")]
    Sender,
    #[serde(rename = "destino")]
    Receiver,
}

impl TrafficRecord {
    /// The role is attributed per key: an address that sourced any bytes
    /// under this key within the window is the sender.
    pub fn new(timestamp: String, key: Key, count: Counters) -> Self {
        let Key(address, service) = key;

        let role = match count.sent > 0 {
            true  => Role::Sender,
            false => Role::Receiver,
        };

        Self {
            timestamp: timestamp,
            address:   address,
            service:   service,
            sent:      count.sent,
            received:  count.received,
            role:      role,
        }
    }
}
