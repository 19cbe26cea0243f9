use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use chrono::Local;
use crossbeam_channel::Sender;
use log::warn;
use crate::record::TrafficRecord;
use crate::registry::Registry;
use super::{Config, Segment, Service};
use super::flow::{Counters, Key};
use super::timer::Timer;
use crossbeam_channel::TrySendError::*;

/// Per-capture-task window accumulator.
///
/// Segments are filtered against the registry snapshot and the forbidden
/// ports, classified, and summed per (address, service) key. When the
/// window timer fires the accumulator is drained into one batch of
/// records and the filtering snapshot is refreshed.
pub struct Queue {
    window:   HashMap<Key, Counters>,
    known:    HashSet<IpAddr>,
    cfg:      Arc<Config>,
    registry: Arc<Registry>,
    local:    IpAddr,
    timer:    Timer,
    tx:       Sender<Vec<TrafficRecord>>,
    done:     bool,
}

impl Queue {
    pub fn new(cfg: Arc<Config>, registry: Arc<Registry>, local: IpAddr, tx: Sender<Vec<TrafficRecord>>) -> Self {
        let mut known = registry.snapshot();
        known.insert(local);

        let timer = Timer::new(cfg.interval);

        Self {
            window:   HashMap::new(),
            known:    known,
            cfg:      cfg,
            registry: registry,
            local:    local,
            timer:    timer,
            tx:       tx,
            done:     false,
        }
    }

    pub fn account(&mut self, segment: Segment) {
        if !self.known.contains(&segment.src) && !self.known.contains(&segment.dst) {
            return;
        }

        if self.cfg.forbidden.contains(&segment.sport) || self.cfg.forbidden.contains(&segment.dport) {
            return;
        }

        let service = Service::classify(&self.cfg, segment.sport, segment.dport);

        self.window.entry(Key(segment.src, service)).or_default().sent     += segment.bytes;
        self.window.entry(Key(segment.dst, service)).or_default().received += segment.bytes;
    }

    /// Close the window if its timer has fired, then refresh the
    /// filtering snapshot for the next one.
    pub fn export(&mut self, now: Instant) {
        if !self.timer.ready(now) {
            return;
        }

        self.send();

        self.known = self.registry.snapshot();
        self.known.insert(self.local);
    }

    /// Drain whatever the open window holds, regardless of the timer.
    /// Used on shutdown so accumulated bytes are not lost; an empty
    /// window sends nothing.
    pub fn flush(&mut self) {
        if !self.window.is_empty() {
            self.send();
        }
    }

    fn send(&mut self) {
        let stamp   = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let records = self.window.drain().map(|(key, count)| {
            TrafficRecord::new(stamp.clone(), key, count)
        }).collect();

        match self.tx.try_send(records) {
            Ok(_)                => (),
            Err(Full(_))         => warn!("record channel full"),
            Err(Disconnected(_)) => self.done = true,
        }
    }

    pub fn done(&self) -> bool {
        self.done
    }
}
