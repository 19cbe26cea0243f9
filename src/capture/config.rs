use std::collections::HashSet;
use std::convert::TryInto;
use std::time::Duration;
use anyhow::{anyhow, Result};
use pcap::{Active, Capture};

#[derive(Clone, Debug)]
pub struct Config {
    pub http_port:   u16,
    pub ftp_port:    u16,
    pub forbidden:   HashSet<u16>,
    pub interval:    Duration,
    pub buffer_size: u64,
    pub snaplen:     u64,
    pub promisc:     bool,
}

pub fn capture(dev: &str, cfg: &Config) -> Result<Capture<Active>> {
    let mut cap = Capture::from_device(dev)?
        .buffer_size(cfg.buffer_size as i32)
        .timeout(cfg.interval.as_millis().try_into()?)
        .snaplen(cfg.snaplen as i32)
        .promisc(cfg.promisc)
        .open()?;

    match cap.list_datalinks()?.into_iter().find(|lt| lt.0 == 1) {
        Some(linktype) => cap.set_datalink(linktype)?,
        None           => return Err(anyhow!("not ethernet")),
    }

    Ok(cap)
}
