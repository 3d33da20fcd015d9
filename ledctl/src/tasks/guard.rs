// Single-Writer Guard für den Host

use std::thread;

use ledctl_core::{ProcessGuard, ProcessRecord};

use crate::config::{GUARD_GRACE, LOOP_SIGNATURE};
use crate::hal::{NixSignaller, PsProcessLister};

/// Guard mit `ps`-Lister, `kill(2)`-Signaller und der eigenen PID
pub fn host_guard() -> ProcessGuard<PsProcessLister, NixSignaller> {
    ProcessGuard::new(PsProcessLister, NixSignaller, std::process::id())
        .with_signature(LOOP_SIGNATURE)
}

/// Beendet alle fremden Pattern-Schleifen, liefert deren Anzahl
///
/// Blockiert bis zu GUARD_GRACE, falls etwas gefunden wurde.
pub fn kill_all_patterns() -> usize {
    host_guard().terminate_all(GUARD_GRACE, thread::sleep)
}

/// Laufende Pattern-Schleifen (ohne den eigenen Prozess)
pub fn running_patterns() -> Vec<ProcessRecord> {
    host_guard().find_running()
}
