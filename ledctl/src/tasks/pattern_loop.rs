// Pattern-Schleife: Registry → Plan → Guard → Verbindung → Scheduler

use std::sync::atomic::AtomicBool;

use ledctl_core::patterns::lookup;
use ledctl_core::{Clock, LineConfig, PatternParams, PatternSession, SessionReport};
use log::info;

use crate::error::Result;
use crate::hal::{MonotonicClock, SerialConnection, shutdown_flag};
use crate::tasks::guard::kill_all_patterns;

/// Startet ein Pattern und blockiert bis SIGINT/SIGTERM
///
/// Mit `kill_existing` werden vorher alle anderen Pattern-Schleifen auf dem
/// Host beendet. Ein Stopp-Signal ist ein sauberes Ende: die Verbindung
/// wird geschlossen und `Ok` zurückgegeben.
pub fn run_pattern(
    name: &str,
    params: &PatternParams,
    line: &LineConfig,
    kill_existing: bool,
) -> Result<SessionReport> {
    let cancel = shutdown_flag()?;
    run_pattern_with(name, params, line, &cancel, || {
        if kill_existing { kill_all_patterns() } else { 0 }
    })
}

/// Wie `run_pattern`, aber mit eigenem Abbruch-Flag und eigenem Guard-Schritt
///
/// Ablauf: Name und Parameter prüfen, `clear_existing()` aufrufen, erst
/// dann den Port öffnen. Ungültige Eingaben beenden also keine fremden
/// Schleifen, und kein fremder Writer hält den Port beim Öffnen.
pub fn run_pattern_with(
    name: &str,
    params: &PatternParams,
    line: &LineConfig,
    cancel: &AtomicBool,
    clear_existing: impl FnOnce() -> usize,
) -> Result<SessionReport> {
    let descriptor = lookup(name)?;
    let plan = descriptor.plan(params, line)?;

    let stopped = clear_existing();
    if stopped > 0 {
        info!("Guard: cleared {} running pattern loop(s)", stopped);
    }
    info!("Pattern: {} ({})", descriptor.name, descriptor.summary);

    // Pattern-eigene Byte-Pause gilt nur für diese Verbindung
    let line = line.clone().with_inter_byte_delay(plan.inter_byte_delay);
    let conn = SerialConnection::open(&line)?;

    let mut clock = MonotonicClock::new();
    let mut session = PatternSession::new(conn, plan, clock.now())?;
    let report = session.run(&mut clock, cancel)?;
    if report.skipped_ticks > 0 {
        info!("Pattern: {} tick(s) skipped in total", report.skipped_ticks);
    }
    Ok(report)
}
