//! Gemeinsame Mocks für die Integration Tests
//!
//! Jede Test-Binary nutzt nur einen Teil davon.
#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use ledctl_core::{
    Clock, Frame, FrameWriter, LedError, ProcessLister, ProcessRecord, ProcessSignaller, StopSignal,
};

// ============================================================================
// Mock Frame Writer
// ============================================================================

#[derive(Default)]
pub struct MockFrameWriter {
    pub frames: Vec<Frame>,
    pub close_count: usize,
    pub fail_next_write: bool,
    closed: bool,
}

impl MockFrameWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameWriter for MockFrameWriter {
    fn send(&mut self, frame: &Frame) -> Result<(), LedError> {
        if self.closed {
            return Err(LedError::NotOpen);
        }
        if self.fail_next_write {
            self.fail_next_write = false;
            self.close();
            return Err(LedError::WriteFailed { byte_index: 0 });
        }
        self.frames.push(*frame);
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
        self.close_count += 1;
    }

    fn is_open(&self) -> bool {
        !self.closed
    }
}

// ============================================================================
// Fake Clock (virtuelle Zeit)
// ============================================================================

/// Schlafen springt sofort zur Deadline
///
/// - `work`: Zeit, die nach jedem Aufwachen bis zum nächsten `advance` vergeht
/// - `cancel_at`: ab dieser Deadline wird während des Schlafens abgebrochen
/// - `stall`: beim n-ten Schlafen (1-basiert) vergeht zusätzlich diese Zeit
pub struct FakeClock {
    now: Duration,
    pub work: Duration,
    pub cancel_at: Option<Duration>,
    pub stall: Option<(usize, Duration)>,
    pub deadlines: Vec<Duration>,
}

impl FakeClock {
    pub fn new(start: Duration) -> Self {
        Self {
            now: start,
            work: Duration::ZERO,
            cancel_at: None,
            stall: None,
            deadlines: Vec::new(),
        }
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep_until(&mut self, deadline: Duration, cancel: &AtomicBool) {
        if let Some(at) = self.cancel_at {
            if deadline >= at {
                self.now = self.now.max(at);
                cancel.store(true, Ordering::SeqCst);
                return;
            }
        }
        self.deadlines.push(deadline);
        self.now = deadline + self.work;
        if let Some((n, extra)) = self.stall {
            if self.deadlines.len() == n {
                self.now += extra;
            }
        }
    }
}

// ============================================================================
// Fake Prozesstabelle
// ============================================================================

/// Erfundene Prozesstabelle, die Signale aufzeichnet
///
/// SIGTERM entfernt den Prozess, außer seine PID steht in `ignore_term`.
/// SIGKILL entfernt ihn immer.
#[derive(Default)]
pub struct FakeProcessTable {
    pub records: RefCell<Vec<ProcessRecord>>,
    pub signals: RefCell<Vec<(u32, StopSignal)>>,
    pub ignore_term: Vec<u32>,
    pub fail_list: bool,
}

impl FakeProcessTable {
    pub fn with(records: &[(u32, &str)]) -> Self {
        Self {
            records: RefCell::new(
                records
                    .iter()
                    .map(|(pid, cmd)| ProcessRecord::new(*pid, *cmd))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    pub fn signals(&self) -> Vec<(u32, StopSignal)> {
        self.signals.borrow().clone()
    }

    pub fn alive(&self, pid: u32) -> bool {
        self.records.borrow().iter().any(|r| r.pid == pid)
    }
}

impl ProcessLister for FakeProcessTable {
    fn list(&self) -> Result<Vec<ProcessRecord>, LedError> {
        if self.fail_list {
            return Err(LedError::ProcessTable);
        }
        Ok(self.records.borrow().clone())
    }
}

impl ProcessSignaller for FakeProcessTable {
    fn signal(&self, pid: u32, signal: StopSignal) -> Result<(), LedError> {
        self.signals.borrow_mut().push((pid, signal));
        let dies = match signal {
            StopSignal::Graceful => !self.ignore_term.contains(&pid),
            StopSignal::Forceful => true,
        };
        if dies {
            self.records.borrow_mut().retain(|r| r.pid != pid);
        }
        Ok(())
    }
}
