//! Laufende Pattern-Schleife
//!
//! Eine `PatternSession` besitzt die Verbindung, den aufgelösten Plan und den
//! Scheduler. `run` schließt die Verbindung auf jedem Weg, bevor es
//! zurückkehrt (Abbruch, Fehler oder Ende).

use core::sync::atomic::AtomicBool;
use core::time::Duration;

use log::{info, trace, warn};

use crate::error::LedError;
use crate::patterns::PatternPlan;
use crate::scheduler::Scheduler;
use crate::traits::{Clock, FrameWriter};

/// Lebenszyklus einer Pattern-Schleife
///
/// `Killed` (SIGKILL) ist im Prozess nicht beobachtbar und fehlt deshalb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Starting,
    Running,
    /// Stopp-Signal erhalten, Verbindung wird geschlossen
    Terminating,
    /// Verbindung freigegeben
    Stopped,
}

/// Zusammenfassung nach Ende der Schleife
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub frames_sent: u64,
    pub skipped_ticks: u64,
}

pub struct PatternSession<W: FrameWriter> {
    writer: W,
    plan: PatternPlan,
    scheduler: Scheduler,
    state: LoopState,
}

impl<W: FrameWriter> PatternSession<W> {
    /// Erstellt eine Session; der erste Frame geht sofort bei `start` raus
    pub fn new(writer: W, plan: PatternPlan, start: Duration) -> Result<Self, LedError> {
        Ok(Self {
            writer,
            plan,
            scheduler: Scheduler::new(plan.tick, start)?,
            state: LoopState::Starting,
        })
    }

    pub fn plan(&self) -> &PatternPlan {
        &self.plan
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Sendet den Plan-Frame im Takt, bis `cancel` gesetzt wird
    pub fn run<C: Clock>(&mut self, clock: &mut C, cancel: &AtomicBool) -> Result<SessionReport, LedError> {
        let plan = self.plan;
        let writer = &mut self.writer;
        self.state = LoopState::Running;
        info!(
            "Pattern: running {} b={} s={} every {:?}",
            plan.mode, plan.brightness, plan.speed, plan.tick
        );

        let result = self.scheduler.run(clock, cancel, || {
            let frame = plan.frame();
            trace!("Pattern: tx {}", frame);
            writer.send(&frame)
        });

        self.state = LoopState::Terminating;
        self.writer.close();
        self.state = LoopState::Stopped;

        let report = SessionReport {
            frames_sent: self.scheduler.ticks(),
            skipped_ticks: self.scheduler.skipped(),
        };
        match result {
            Ok(()) => {
                info!(
                    "Pattern: stopped after {} frame(s), connection closed",
                    report.frames_sent
                );
                Ok(report)
            }
            Err(e) => {
                warn!("Pattern: aborted after {} frame(s): {}", report.frames_sent, e);
                Err(e)
            }
        }
    }
}
