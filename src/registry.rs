use std::collections::HashSet;
use std::net::IpAddr;
use parking_lot::Mutex;

/// Set of peer addresses considered relevant for traffic accounting.
///
/// Written by the listener services, read by the capture tasks. The set
/// only grows during a run.
#[derive(Debug, Default)]
pub struct Registry {
    peers: Mutex<HashSet<IpAddr>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            peers: Mutex::new(HashSet::new()),
        }
    }

    pub fn add(&self, addr: IpAddr) {
        self.peers.lock().insert(addr);
    }

    /// Copy of the current members, taken under the lock.
    pub fn snapshot(&self) -> HashSet<IpAddr> {
        self.peers.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.peers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.lock().is_empty()
    }
}
