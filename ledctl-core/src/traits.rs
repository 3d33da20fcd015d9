//! Abstraktions-Traits
//!
//! Diese Traits definieren Schnittstellen für Serial-, Zeit- und
//! Prozess-Zugriff ohne konkrete Implementierung.
//!
//! # Implementierungen
//! - **Production:** `SerialConnection`, `MonotonicClock`, `PsProcessLister`,
//!   `NixSignaller` (Crate `ledctl`)
//! - **Testing:** Mocks in `ledctl-tests`

use alloc::vec::Vec;
use core::sync::atomic::AtomicBool;
use core::time::Duration;

use crate::error::LedError;
use crate::types::{Frame, ProcessRecord};

/// Schreibzugriff auf die serielle Leitung
pub trait FrameWriter {
    /// Sendet einen kompletten Frame (inkl. Pausen zwischen den Bytes)
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn ein Byte nicht geschrieben
    /// werden konnte. Die Verbindung ist danach geschlossen.
    fn send(&mut self, frame: &Frame) -> Result<(), LedError>;

    /// Gibt das Gerät frei. Mehrfacher Aufruf ist erlaubt.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}

/// Monotone Zeitquelle für den Scheduler
pub trait Clock {
    /// Vergangene Zeit seit einem festen Ursprung
    fn now(&self) -> Duration;

    /// Blockiert bis `deadline` erreicht ist
    ///
    /// Darf früher zurückkehren, sobald `cancel` gesetzt ist.
    fn sleep_until(&mut self, deadline: Duration, cancel: &AtomicBool);
}

/// Liest die Prozesstabelle des Hosts
pub trait ProcessLister {
    fn list(&self) -> Result<Vec<ProcessRecord>, LedError>;
}

/// Art des Stopp-Signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    /// Kooperativ (SIGTERM): Loop räumt auf und schließt den Port
    Graceful,
    /// Erzwungen (SIGKILL): keine Aufräum-Garantie
    Forceful,
}

/// Stellt Stopp-Signale an fremde Prozesse zu
pub trait ProcessSignaller {
    fn signal(&self, pid: u32, signal: StopSignal) -> Result<(), LedError>;
}
