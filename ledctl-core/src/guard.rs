//! Single-Writer Guard über Prozessgrenzen
//!
//! Pattern-Schleifen laufen als eigenständige Prozesse. Bevor eine neue
//! startet, beendet der Guard alle anderen: erst kooperativ (damit sie ihren
//! Port schließen), nach der Gnadenfrist erzwungen.
//!
//! Alle Prozess-Operationen sind "best effort": Fehler werden geloggt und
//! blockieren nie den Start des neuen Patterns.

use alloc::vec::Vec;
use core::time::Duration;

use log::{debug, info, warn};

use crate::traits::{ProcessLister, ProcessSignaller, StopSignal};
use crate::types::ProcessRecord;

/// Erkennungsmerkmal einer Pattern-Schleife in der Kommandozeile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSignature {
    /// Basename des Programms (`ledctl`)
    pub program: &'static str,
    /// Subcommand, das eine Schleife startet (`setpattern`)
    pub subcommand: &'static str,
    /// Administrative Aufrufe, die nie als Schleife gelten
    pub admin_args: &'static [&'static str],
    /// Flags, deren Wert als eigenes Token folgt (`-p /dev/ttyUSB0`)
    pub value_flags: &'static [&'static str],
}

impl LoopSignature {
    pub const DEFAULT: LoopSignature = LoopSignature {
        program: "ledctl",
        subcommand: "setpattern",
        admin_args: &["list", "kill", "status"],
        value_flags: &[
            "-p", "--port", "-B", "--baud", "-d", "--delay", "-b", "--brightness", "-s",
            "--speed", "--period", "--mode-num",
        ],
    };

    /// `true` wenn `cmdline` eine laufende Pattern-Schleife beschreibt
    ///
    /// Verlangt wird ein Token mit Basename `program`, danach das
    /// Subcommand und ein Ziel. Ziel ist das erste Argument, das weder
    /// Flag noch Wert eines Flags ist. Fehlt es, bedeutet der Aufruf
    /// `list`; ist es ein Admin-Befehl, zählt er ebenfalls nicht.
    pub fn matches(&self, cmdline: &str) -> bool {
        let mut tokens = cmdline.split_whitespace();

        if !tokens
            .by_ref()
            .any(|t| t.rsplit('/').next() == Some(self.program))
        {
            return false;
        }
        if !tokens.by_ref().any(|t| t == self.subcommand) {
            return false;
        }

        let mut target = None;
        while let Some(token) = tokens.next() {
            if token.starts_with('-') {
                if self.takes_value(token) {
                    tokens.next();
                }
                continue;
            }
            target = Some(token);
            break;
        }
        match target {
            Some(target) => !self.admin_args.contains(&target),
            None => false,
        }
    }

    /// Flag ohne `=`, dessen Wert im nächsten Token steht
    ///
    /// Gebündelte Kurzflags (`-gb 2`) zählen, wenn das letzte Zeichen
    /// einen Wert verlangt.
    fn takes_value(&self, flag: &str) -> bool {
        if flag.contains('=') {
            return false;
        }
        if self.value_flags.contains(&flag) {
            return true;
        }
        match flag.strip_prefix('-') {
            Some(shorts) if !shorts.starts_with('-') && shorts.len() > 1 => {
                shorts.chars().last().is_some_and(|last| {
                    self.value_flags
                        .iter()
                        .any(|f| f.len() == 2 && f.ends_with(last))
                })
            }
            _ => false,
        }
    }
}

impl Default for LoopSignature {
    fn default() -> Self {
        Self::DEFAULT
    }
}

pub struct ProcessGuard<L, S> {
    lister: L,
    signaller: S,
    own_pid: u32,
    signature: LoopSignature,
}

impl<L: ProcessLister, S: ProcessSignaller> ProcessGuard<L, S> {
    pub fn new(lister: L, signaller: S, own_pid: u32) -> Self {
        Self {
            lister,
            signaller,
            own_pid,
            signature: LoopSignature::DEFAULT,
        }
    }

    pub fn with_signature(mut self, signature: LoopSignature) -> Self {
        self.signature = signature;
        self
    }

    pub fn own_pid(&self) -> u32 {
        self.own_pid
    }

    /// Alle fremden Pattern-Schleifen auf dem Host
    ///
    /// Ist die Prozesstabelle nicht lesbar, wird eine leere Liste geliefert.
    pub fn find_running(&self) -> Vec<ProcessRecord> {
        match self.lister.list() {
            Ok(records) => records
                .into_iter()
                .filter(|r| r.pid != self.own_pid && self.signature.matches(&r.cmdline))
                .collect(),
            Err(e) => {
                warn!("Guard: {}; continuing without single-writer check", e);
                Vec::new()
            }
        }
    }

    /// Beendet alle gefundenen Schleifen, liefert die ursprüngliche Anzahl
    ///
    /// 1. SIGTERM an alle, 2. `wait(grace)`, 3. neu scannen,
    /// 4. SIGKILL an Überlebende aus der ursprünglichen Menge.
    pub fn terminate_all(&self, grace: Duration, wait: impl FnOnce(Duration)) -> usize {
        let found = self.find_running();
        if found.is_empty() {
            debug!("Guard: no running pattern loops");
            return 0;
        }

        for record in &found {
            info!("Guard: stopping pid {} ({})", record.pid, record.cmdline);
            if let Err(e) = self.signaller.signal(record.pid, StopSignal::Graceful) {
                warn!("Guard: {}", e);
            }
        }

        wait(grace);

        let survivors: Vec<ProcessRecord> = self
            .find_running()
            .into_iter()
            .filter(|r| found.iter().any(|f| f.pid == r.pid))
            .collect();
        for record in &survivors {
            warn!("Guard: pid {} ignored stop request, killing", record.pid);
            if let Err(e) = self.signaller.signal(record.pid, StopSignal::Forceful) {
                warn!("Guard: {}", e);
            }
        }

        info!(
            "Guard: terminated {} pattern loop(s), {} forcefully",
            found.len(),
            survivors.len()
        );
        found.len()
    }
}

// Referenzen erlauben es, dieselbe Tabelle als Lister und Signaller zu nutzen
impl<T: ProcessLister + ?Sized> ProcessLister for &T {
    fn list(&self) -> Result<Vec<ProcessRecord>, crate::LedError> {
        (**self).list()
    }
}

impl<T: ProcessSignaller + ?Sized> ProcessSignaller for &T {
    fn signal(&self, pid: u32, signal: StopSignal) -> Result<(), crate::LedError> {
        (**self).signal(pid, signal)
    }
}
