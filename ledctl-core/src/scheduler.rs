//! Drift-korrigierter periodischer Tick-Treiber
//!
//! Der Scheduler hält eine monotone "nächste Deadline". Nach jeder Aktion
//! wird sie um genau einen nominellen Tick verschoben (nicht `now + tick`),
//! damit sich Jitter nicht über viele Zyklen aufsummiert. Das ist wichtig
//! für phasengekoppelte Effekte wie Breathing, bei denen das Sende-Intervall
//! gleichzeitig die sichtbare Animationsperiode ist.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;

use log::{debug, warn};

use crate::error::LedError;
use crate::traits::Clock;

/// Ergebnis eines Deadline-Vorschubs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Nächste Deadline liegt in der Zukunft
    OnTime,
    /// Höchstens einen Tick zu spät, nächster Tick läuft sofort
    Late,
    /// Mehr als einen Tick zu spät: so viele Ticks wurden übersprungen
    Skipped(u64),
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    tick: Duration,
    origin: Duration,
    next_deadline: Duration,
    ticks: u64,
    skipped: u64,
}

impl Scheduler {
    /// Erstellt einen Scheduler mit erster Deadline `start` (sofortiger erster Tick)
    pub fn new(tick: Duration, start: Duration) -> Result<Self, LedError> {
        if tick.is_zero() {
            return Err(LedError::InvalidParameter("tick must be positive"));
        }
        Ok(Self {
            tick,
            origin: start,
            next_deadline: start,
            ticks: 0,
            skipped: 0,
        })
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub fn origin(&self) -> Duration {
        self.origin
    }

    pub fn next_deadline(&self) -> Duration {
        self.next_deadline
    }

    /// Anzahl ausgeführter Aktionen
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Anzahl übersprungener Deadlines (nach langen Stalls)
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Verschiebt die Deadline nach einer ausgeführten Aktion
    ///
    /// Liegt die neue Deadline mehr als einen Tick hinter `now`, wird nicht
    /// "aufgeholt": die Deadline springt auf den ersten Rasterpunkt strikt
    /// nach `now`. Das Raster `origin + k * tick` bleibt dabei erhalten.
    pub fn advance(&mut self, now: Duration) -> Advance {
        self.ticks += 1;
        self.next_deadline += self.tick;

        if now <= self.next_deadline {
            return Advance::OnTime;
        }

        let behind = now - self.next_deadline;
        if behind <= self.tick {
            return Advance::Late;
        }

        let steps = behind.as_nanos() / self.tick.as_nanos() + 1;
        let jump = self.tick.as_nanos() * steps;
        self.next_deadline += Duration::from_nanos(jump as u64);
        self.skipped += steps as u64;
        Advance::Skipped(steps as u64)
    }

    /// Führt `action` im Takt aus, bis `cancel` gesetzt wird
    ///
    /// Abbruch ist ein sauberes Ende (`Ok`). Ein Fehler der Aktion beendet
    /// die Schleife sofort und wird durchgereicht.
    pub fn run<C, E, F>(&mut self, clock: &mut C, cancel: &AtomicBool, mut action: F) -> Result<(), E>
    where
        C: Clock,
        F: FnMut() -> Result<(), E>,
    {
        loop {
            if cancel.load(Ordering::SeqCst) {
                debug!("Scheduler: cancelled after {} tick(s)", self.ticks);
                return Ok(());
            }

            if clock.now() < self.next_deadline {
                clock.sleep_until(self.next_deadline, cancel);
                if cancel.load(Ordering::SeqCst) {
                    debug!("Scheduler: cancelled while waiting ({} tick(s))", self.ticks);
                    return Ok(());
                }
            }

            action()?;

            if let Advance::Skipped(n) = self.advance(clock.now()) {
                warn!(
                    "Scheduler: stalled, skipped {} tick(s) of {:?}; resuming at {:?}",
                    n, self.tick, self.next_deadline
                );
            }
        }
    }
}
