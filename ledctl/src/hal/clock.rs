// Monotone Uhr für den Scheduler

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use ledctl_core::Clock;

use crate::config::CANCEL_POLL_INTERVAL;

/// `Instant`-basierte Uhr; schläft in Scheiben, um Abbruch zeitnah zu bemerken
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
    poll: Duration,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::with_poll_interval(CANCEL_POLL_INTERVAL)
    }

    pub fn with_poll_interval(poll: Duration) -> Self {
        Self {
            origin: Instant::now(),
            poll,
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep_until(&mut self, deadline: Duration, cancel: &AtomicBool) {
        loop {
            if cancel.load(Ordering::SeqCst) {
                return;
            }
            let now = self.now();
            if now >= deadline {
                return;
            }
            thread::sleep((deadline - now).min(self.poll));
        }
    }
}
