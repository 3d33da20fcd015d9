// Prozesstabelle und Signale (Linux)

use std::process::Command;

use ledctl_core::{LedError, ProcessLister, ProcessRecord, ProcessSignaller, StopSignal};
use log::{debug, warn};
use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

/// Liest die Prozesstabelle über `ps -eo pid=,args=`
#[derive(Debug, Clone, Copy, Default)]
pub struct PsProcessLister;

impl ProcessLister for PsProcessLister {
    fn list(&self) -> Result<Vec<ProcessRecord>, LedError> {
        let output = Command::new("ps")
            .args(["-eo", "pid=,args="])
            .output()
            .map_err(|e| {
                warn!("Guard: cannot run ps: {}", e);
                LedError::ProcessTable
            })?;
        if !output.status.success() {
            warn!("Guard: ps exited with {}", output.status);
            return Err(LedError::ProcessTable);
        }
        Ok(parse_ps_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Zerlegt `ps`-Ausgabe ("  PID ARGS...") in Records
///
/// Zeilen ohne gültige PID werden übersprungen.
pub fn parse_ps_output(text: &str) -> Vec<ProcessRecord> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim_start();
            let (pid, args) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let pid = pid.parse().ok()?;
            Some(ProcessRecord::new(pid, args.trim()))
        })
        .collect()
}

/// Stellt SIGTERM / SIGKILL über `kill(2)` zu
#[derive(Debug, Clone, Copy, Default)]
pub struct NixSignaller;

impl ProcessSignaller for NixSignaller {
    fn signal(&self, pid: u32, signal: StopSignal) -> Result<(), LedError> {
        let raw = i32::try_from(pid).map_err(|_| LedError::SignalFailed { pid })?;
        let sig = match signal {
            StopSignal::Graceful => Signal::SIGTERM,
            StopSignal::Forceful => Signal::SIGKILL,
        };
        match kill(Pid::from_raw(raw), sig) {
            Ok(()) => Ok(()),
            // Bereits beendet: Ziel erreicht
            Err(Errno::ESRCH) => {
                debug!("Guard: pid {} already gone", pid);
                Ok(())
            }
            Err(e) => {
                warn!("Guard: {} to pid {} failed: {}", sig, pid, e);
                Err(LedError::SignalFailed { pid })
            }
        }
    }
}
