use serde::{Deserialize, Serialize};
use super::Config;

/// Classification label assigned to a segment from its TCP ports.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum Service {
    #[serde(rename = "HTTP")]
    Http,
    #[serde(rename = "FTP")]
    Ftp,
    #[serde(rename = "Outro")]
    Other,
}

impl Service {
    /// The HTTP port is checked first so it wins when a segment's ports
    /// collide with both configured services.
    pub fn classify(cfg: &Config, sport: u16, dport: u16) -> Service {
        if sport == cfg.http_port || dport == cfg.http_port {
            Service::Http
        } else if sport == cfg.ftp_port || dport == cfg.ftp_port {
            Service::Ftp
        } else {
            Service::Other
        }
    }
}
