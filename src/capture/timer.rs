use std::time::{Duration, Instant};

pub struct Timer {
    delay: Duration,
    next:  Instant,
}

impl Timer {
    pub fn new(delay: Duration) -> Self {
        Timer {
            delay: delay,
            next:  Instant::now() + delay,
        }
    }

    pub fn ready(&mut self, ts: Instant) -> bool {
        if self.next <= ts {
            self.next = ts + self.delay;
            true
        } else {
            false
        }
    }
}
