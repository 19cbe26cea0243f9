use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use anyhow::Result;
use crossbeam_channel::Sender;
use log::{debug, info, warn};
use pcap::Device;
use crate::record::TrafficRecord;
use crate::registry::Registry;
use super::{capture, decode, Config, Queue, Segment};
use pcap::Error::*;

/// Spawns one capture task per available interface, all feeding the
/// same record channel.
pub struct Sources {
    cfg:      Arc<Config>,
    registry: Arc<Registry>,
    local:    IpAddr,
    tx:       Sender<Vec<TrafficRecord>>,
}

impl Sources {
    pub fn new(cfg: Config, registry: Arc<Registry>, local: IpAddr, tx: Sender<Vec<TrafficRecord>>) -> Self {
        Self {
            cfg:      Arc::new(cfg),
            registry: registry,
            local:    local,
            tx:       tx,
        }
    }

    pub fn start(&self, device: Option<String>, shutdown: Arc<AtomicBool>) -> Result<Vec<JoinHandle<()>>> {
        let devices = match device {
            Some(name) => vec![name],
            None       => Device::list()?.into_iter().map(|d| d.name).collect(),
        };

        if devices.is_empty() {
            warn!("no capture devices available");
        }

        let mut workers = Vec::new();

        for name in devices {
            let queue = Queue::new(self.cfg.clone(), self.registry.clone(), self.local, self.tx.clone());
            let mut task = Task::new(self.cfg.clone(), queue, shutdown.clone());

            workers.push(thread::spawn(move || {
                info!("starting {} capture", name);
                match task.poll(&name) {
                    Ok(()) => debug!("capture {} finished", name),
                    Err(e) => warn!("capture {} stopped: {:?}", name, e),
                }
            }));
        }

        Ok(workers)
    }
}

pub struct Task {
    cfg:   Arc<Config>,
    queue: Queue,
    stop:  Arc<AtomicBool>,
}

impl Task {
    pub fn new(cfg: Arc<Config>, queue: Queue, stop: Arc<AtomicBool>) -> Self {
        Self { cfg, queue, stop }
    }

    fn poll(&mut self, dev: &str) -> Result<()> {
        let mut cap = capture(dev, &self.cfg)?;
        self.run(dev, || {
            cap.next().map(|pkt| decode(pkt.data, pkt.header.len as u64))
        })
    }

    /// Poll loop over a segment source. The stop flag is checked at the
    /// top of every iteration; a window already open when the flag is
    /// raised is flushed before the loop exits.
    pub fn run<F>(&mut self, dev: &str, mut next: F) -> Result<()>
    where
        F: FnMut() -> Result<Option<Segment>, pcap::Error>,
    {
        while !self.stop.load(Ordering::Acquire) && !self.queue.done() {
            match next() {
                Ok(Some(segment)) => {
                    self.queue.account(segment);
                    self.queue.export(Instant::now());
                }
                Ok(None)            => self.queue.export(Instant::now()),
                Err(TimeoutExpired) => self.queue.export(Instant::now()),
                Err(NoMorePackets)  => break,
                Err(e)              => {
                    warn!("capture {} error, skipping window: {}", dev, e);
                    thread::sleep(self.cfg.interval);
                    self.queue.export(Instant::now());
                }
            }
        }

        self.queue.flush();

        if self.stop.load(Ordering::Acquire) {
            info!("execution manually interrupted");
        }

        Ok(())
    }
}
